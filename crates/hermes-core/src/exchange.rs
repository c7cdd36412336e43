//! The exchange: correlation state shared between a request and its paired
//! response or fault.
//!
//! An [`Exchange`] is exclusive to one logical call. Its interior atomics and
//! lock exist so the inbound and outbound messages of that call can share the
//! handle, not for sharing across concurrent calls.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// A unique identifier for one logical call, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeId(Uuid);

impl ExchangeId {
    /// Creates a new unique exchange ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation state shared by the request and response/fault messages of
/// one logical call.
///
/// Cloning an `Exchange` clones a handle to the same underlying state.
///
/// # Coordination flag ownership
///
/// `inbound_validation_failed` has documented one-way ownership: the inbound
/// validation interceptor writes it, the outbound validation interceptor only
/// reads it. Nothing else touches it.
///
/// # Example
///
/// ```
/// use hermes_core::Exchange;
///
/// let exchange = Exchange::new();
/// assert!(!exchange.inbound_validation_failed());
/// exchange.mark_inbound_validation_failed();
/// assert!(exchange.inbound_validation_failed());
/// ```
#[derive(Clone)]
pub struct Exchange {
    inner: Arc<ExchangeInner>,
}

impl std::fmt::Debug for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exchange")
            .field("id", &self.inner.id)
            .field(
                "inbound_validation_failed",
                &self.inner.inbound_validation_failed,
            )
            .field("one_way", &self.inner.one_way)
            .finish_non_exhaustive()
    }
}

struct ExchangeInner {
    id: ExchangeId,
    /// Written by inbound validation, read by outbound validation.
    inbound_validation_failed: AtomicBool,
    /// Set when the call has no response direction.
    one_way: AtomicBool,
    /// Call-scoped typed properties (provider overrides and similar).
    properties: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl Exchange {
    /// Creates a fresh exchange for a new logical call.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ExchangeInner {
                id: ExchangeId::new(),
                inbound_validation_failed: AtomicBool::new(false),
                one_way: AtomicBool::new(false),
                properties: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Returns the exchange identifier.
    #[must_use]
    pub fn id(&self) -> ExchangeId {
        self.inner.id
    }

    /// Records that inbound validation failed for this call.
    ///
    /// Only the inbound validation interceptor calls this.
    pub fn mark_inbound_validation_failed(&self) {
        self.inner
            .inbound_validation_failed
            .store(true, Ordering::Release);
    }

    /// Returns `true` if inbound validation failed for this call.
    #[must_use]
    pub fn inbound_validation_failed(&self) -> bool {
        self.inner.inbound_validation_failed.load(Ordering::Acquire)
    }

    /// Marks this call as one-way (no response direction).
    pub fn set_one_way(&self, one_way: bool) {
        self.inner.one_way.store(one_way, Ordering::Release);
    }

    /// Returns `true` if this call is one-way.
    #[must_use]
    pub fn is_one_way(&self) -> bool {
        self.inner.one_way.load(Ordering::Acquire)
    }

    /// Stores a call-scoped typed property, replacing any previous value of
    /// the same type.
    pub fn put<T: Any + Send + Sync>(&self, value: T) {
        self.inner
            .properties
            .write()
            .insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Retrieves a call-scoped typed property.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let properties = self.inner.properties.read();
        let value = properties.get(&TypeId::of::<T>())?;
        Arc::clone(value).downcast::<T>().ok()
    }

    /// Removes a call-scoped typed property.
    pub fn remove<T: Any + Send + Sync>(&self) {
        self.inner.properties.write().remove(&TypeId::of::<T>());
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Tenant(&'static str);

    #[test]
    fn test_clone_shares_state() {
        let exchange = Exchange::new();
        let other = exchange.clone();
        exchange.mark_inbound_validation_failed();
        assert!(other.inbound_validation_failed());
        assert_eq!(exchange.id(), other.id());
    }

    #[test]
    fn test_typed_properties() {
        let exchange = Exchange::new();
        assert!(exchange.get::<Tenant>().is_none());

        exchange.put(Tenant("acme"));
        assert_eq!(*exchange.get::<Tenant>().expect("present"), Tenant("acme"));

        exchange.put(Tenant("globex"));
        assert_eq!(*exchange.get::<Tenant>().expect("present"), Tenant("globex"));

        exchange.remove::<Tenant>();
        assert!(exchange.get::<Tenant>().is_none());
    }

    #[test]
    fn test_one_way_flag() {
        let exchange = Exchange::new();
        assert!(!exchange.is_one_way());
        exchange.set_one_way(true);
        assert!(exchange.is_one_way());
    }

    #[test]
    fn test_distinct_exchanges_are_independent() {
        let first = Exchange::new();
        let second = Exchange::new();
        first.mark_inbound_validation_failed();
        assert!(!second.inbound_validation_failed());
        assert_ne!(first.id(), second.id());
    }
}
