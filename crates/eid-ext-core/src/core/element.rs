// crates/eid-ext-core/src/core/element.rs
// ============================================================================
// Module: Structured Markup Elements
// Description: In-memory element tree exchanged with the XML layer.
// Purpose: Decouple protocol codecs from any particular XML library.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Protocol extensions are encoded to and decoded from a small element tree:
//! a qualified name, ordered attributes, ordered children, and optional text.
//! Decoders match on local names only, so the namespace prefix (and even the
//! namespace URI) chosen by a producer never affects field extraction.
//!
//! Text is tri-state at the tree level: `None` for an element written without
//! content, `Some("")` for one written with an explicit empty body.

// ============================================================================
// SECTION: Names
// ============================================================================

/// Namespace-qualified element name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// Namespace URI, when bound.
    pub namespace: Option<String>,
    /// Preferred prefix for serialization.
    pub prefix: Option<String>,
    /// Local part of the name.
    pub local: String,
}

impl QualifiedName {
    /// Creates a name without a namespace.
    #[must_use]
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            prefix: None,
            local: local.into(),
        }
    }

    /// Creates a namespaced name with a preferred prefix.
    #[must_use]
    pub fn namespaced(
        namespace: impl Into<String>,
        prefix: impl Into<String>,
        local: impl Into<String>,
    ) -> Self {
        Self {
            namespace: Some(namespace.into()),
            prefix: Some(prefix.into()),
            local: local.into(),
        }
    }

    /// Returns a sibling name in the same namespace with a new local part.
    #[must_use]
    pub fn sibling(&self, local: impl Into<String>) -> Self {
        Self {
            namespace: self.namespace.clone(),
            prefix: self.prefix.clone(),
            local: local.into(),
        }
    }

    /// Returns the prefixed form used in markup (`prefix:local` or `local`).
    #[must_use]
    pub fn prefixed(&self) -> String {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", self.local),
            _ => self.local.clone(),
        }
    }
}

// ============================================================================
// SECTION: Attributes
// ============================================================================

/// Unqualified attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value (unescaped).
    pub value: String,
}

// ============================================================================
// SECTION: Elements
// ============================================================================

/// Element node in a structured-markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Element name.
    pub name: QualifiedName,
    /// Attributes in document order.
    pub attributes: Vec<Attribute>,
    /// Child elements in document order.
    pub children: Vec<Self>,
    /// Character content, if any was present.
    pub text: Option<String>,
}

impl Element {
    /// Creates an empty element.
    #[must_use]
    pub const fn new(name: QualifiedName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Adds an attribute, replacing any existing attribute with the same name.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets an attribute in place, replacing an existing value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.attributes.iter_mut().find(|attr| attr.name == name) {
            existing.value = value;
        } else {
            self.attributes.push(Attribute {
                name,
                value,
            });
        }
    }

    /// Returns the local part of the element name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.name.local
    }

    /// Returns the value of the named attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|attr| attr.name == name).map(|attr| attr.value.as_str())
    }

    /// Returns the first child with the given local name.
    #[must_use]
    pub fn child(&self, local: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name.local == local)
    }

    /// Returns all children with the given local name, in order.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |child| child.name.local == local)
    }

    /// Returns the text content.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the text of the first child with the given local name.
    #[must_use]
    pub fn child_text(&self, local: &str) -> Option<&str> {
        self.child(local).and_then(Self::text)
    }
}
