//! The runtime context: explicitly constructed shared state.
//!
//! Collaborators the embedding framework provides (the extension registry,
//! default validation providers, description loaders) are hosted on a
//! [`Runtime`] built once at startup and passed down. There are no ambient
//! singletons; anything an interceptor or factory needs process-wide comes
//! through here or through its own constructor.

use crate::extension::ExtensionRegistry;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// The passed-down context object hosting shared collaborators.
///
/// Built once via [`Runtime::builder`], read-only thereafter.
///
/// # Example
///
/// ```
/// use hermes_core::{InMemoryExtensionRegistry, Runtime};
/// use std::sync::Arc;
///
/// let runtime = Runtime::builder()
///     .extension_registry(Arc::new(InMemoryExtensionRegistry::new()))
///     .build();
/// assert!(runtime.extension_registry().is_some());
/// ```
pub struct Runtime {
    extension_registry: Option<Arc<dyn ExtensionRegistry>>,
    extensions: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Runtime {
    /// Starts building a runtime.
    #[must_use]
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder {
            extension_registry: None,
            extensions: HashMap::new(),
        }
    }

    /// Returns the shared description-extension registry, if configured.
    #[must_use]
    pub fn extension_registry(&self) -> Option<&Arc<dyn ExtensionRegistry>> {
        self.extension_registry.as_ref()
    }

    /// Returns the shared collaborator of the given type, if configured.
    #[must_use]
    pub fn extension<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let value = self.extensions.get(&TypeId::of::<T>())?;
        Arc::clone(value).downcast::<T>().ok()
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    extension_registry: Option<Arc<dyn ExtensionRegistry>>,
    extensions: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl RuntimeBuilder {
    /// Sets the shared description-extension registry.
    #[must_use]
    pub fn extension_registry(mut self, registry: Arc<dyn ExtensionRegistry>) -> Self {
        self.extension_registry = Some(registry);
        self
    }

    /// Adds a shared collaborator, keyed by its type.
    #[must_use]
    pub fn extension<T: Any + Send + Sync>(mut self, value: Arc<T>) -> Self {
        self.extensions.insert(TypeId::of::<T>(), value);
        self
    }

    /// Builds the runtime.
    #[must_use]
    pub fn build(self) -> Runtime {
        Runtime {
            extension_registry: self.extension_registry,
            extensions: self.extensions,
        }
    }
}
