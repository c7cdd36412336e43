//! The description-language extension registry.
//!
//! Service descriptions carry namespace-qualified extensibility elements;
//! bindings register the element types they understand against a shared
//! registry so the description loader can resolve them. The loader itself is
//! a collaborator; this module only defines the registration contract and an
//! in-memory implementation for embedding and tests.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A namespace-qualified element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QName {
    /// The namespace URI.
    pub namespace: String,
    /// The local element name.
    pub local_part: String,
}

impl QName {
    /// Creates a qualified name.
    #[must_use]
    pub fn new(namespace: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_part: local_part.into(),
        }
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.local_part)
    }
}

/// Errors raised by extension registration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtensionError {
    /// The element name or namespace is malformed.
    #[error("Invalid extension element: {message}")]
    InvalidElement {
        /// What was wrong with the element.
        message: String,
    },

    /// The (parent, element) pair is already registered.
    #[error("Duplicate extension registration: {parent} / {element}")]
    Duplicate {
        /// The parent element type.
        parent: String,
        /// The element that was already registered.
        element: QName,
    },
}

/// The shared registry bindings register extensibility elements against.
///
/// Implemented by the description loader; the in-memory
/// [`InMemoryExtensionRegistry`] serves embedding and tests.
pub trait ExtensionRegistry: Send + Sync {
    /// Registers an extensibility element under a parent element type.
    fn register(&self, parent: &str, element: QName) -> Result<(), ExtensionError>;
}

/// In-memory [`ExtensionRegistry`] implementation.
///
/// Rejects empty local names and namespaces, and duplicate
/// (parent, element) pairs.
#[derive(Default)]
pub struct InMemoryExtensionRegistry {
    registrations: RwLock<HashSet<(String, QName)>>,
}

impl InMemoryExtensionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }

    /// Returns `true` if the (parent, element) pair is registered.
    #[must_use]
    pub fn contains(&self, parent: &str, element: &QName) -> bool {
        self.registrations
            .read()
            .contains(&(parent.to_string(), element.clone()))
    }
}

impl ExtensionRegistry for InMemoryExtensionRegistry {
    fn register(&self, parent: &str, element: QName) -> Result<(), ExtensionError> {
        if element.local_part.is_empty() || element.namespace.is_empty() {
            return Err(ExtensionError::InvalidElement {
                message: format!("empty namespace or local name in {element}"),
            });
        }
        if parent.is_empty() {
            return Err(ExtensionError::InvalidElement {
                message: "empty parent element type".to_string(),
            });
        }
        let mut registrations = self.registrations.write();
        if !registrations.insert((parent.to_string(), element.clone())) {
            return Err(ExtensionError::Duplicate {
                parent: parent.to_string(),
                element,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_contains() {
        let registry = InMemoryExtensionRegistry::new();
        let element = QName::new("urn:example", "address");
        registry
            .register("Port", element.clone())
            .expect("registers");
        assert!(registry.contains("Port", &element));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rejects_empty_parts() {
        let registry = InMemoryExtensionRegistry::new();
        assert!(matches!(
            registry.register("Port", QName::new("", "address")),
            Err(ExtensionError::InvalidElement { .. })
        ));
        assert!(matches!(
            registry.register("Port", QName::new("urn:example", "")),
            Err(ExtensionError::InvalidElement { .. })
        ));
        assert!(matches!(
            registry.register("", QName::new("urn:example", "address")),
            Err(ExtensionError::InvalidElement { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_rejects_duplicates() {
        let registry = InMemoryExtensionRegistry::new();
        let element = QName::new("urn:example", "address");
        registry
            .register("Port", element.clone())
            .expect("first registers");
        assert!(matches!(
            registry.register("Port", element.clone()),
            Err(ExtensionError::Duplicate { .. })
        ));
        // Same element under a different parent is fine.
        registry
            .register("Definition", element)
            .expect("different parent registers");
    }

    #[test]
    fn test_qname_display() {
        let element = QName::new("urn:example", "address");
        assert_eq!(element.to_string(), "{urn:example}address");
    }
}
