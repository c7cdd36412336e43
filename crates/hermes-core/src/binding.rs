//! The binding abstraction: protocol-specific interceptor bundles, their
//! factories, and the protocol endpoints they produce.
//!
//! A concrete protocol crate implements [`Binding`], [`BindingFactory`],
//! [`Conduit`], and [`Destination`]; the dispatch framework only ever talks
//! to these traits plus the [`BindingFactoryRegistry`].

use crate::error::{HermesError, HermesResult};
use crate::exchange::Exchange;
use crate::interceptor::Interceptor;
use crate::message::Message;
use crate::phase::Direction;
use crate::service_model::{BindingInfo, EndpointInfo, EndpointReference};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A protocol-specific bundle of interceptor lists plus descriptive metadata
/// for one endpoint.
///
/// The four lists are fixed at construction; the trait offers no mutation.
/// Callers compose the final merged chain from these lists plus any
/// cross-cutting interceptors added independently.
pub trait Binding: Send + Sync {
    /// Returns the description this binding was created from.
    fn binding_info(&self) -> &BindingInfo;

    /// Returns the protocol's interceptors for the given direction, in the
    /// order the factory populated them.
    fn interceptors(&self, direction: Direction) -> &[Arc<dyn Interceptor>];

    /// Creates a protocol message for the given direction, correlated to the
    /// given exchange.
    fn create_message(&self, exchange: Exchange, direction: Direction) -> Message {
        Message::new(exchange, direction)
    }
}

/// Observer a destination hands inbound messages to.
///
/// Implemented by the dispatch framework; the destination calls it once per
/// arriving message.
pub trait MessageObserver: Send + Sync {
    /// Called for each message arriving at the destination.
    fn on_message(&self, message: Message);
}

/// The call-initiating protocol endpoint (client side).
///
/// Conduits own their protocol resources; release them via [`Conduit::close`],
/// not through the factory.
pub trait Conduit: Send + Sync {
    /// Returns the resolved target of this conduit.
    fn target(&self) -> &EndpointReference;

    /// Prepares an outgoing message for transmission (stamps transport
    /// metadata; does not send).
    fn prepare(&self, message: &mut Message) -> HermesResult<()>;

    /// Releases the conduit's protocol resources. Idempotent.
    fn close(&self);
}

/// The call-receiving protocol endpoint (server side).
pub trait Destination: Send + Sync {
    /// Returns the endpoint this destination serves.
    fn endpoint(&self) -> &EndpointInfo;

    /// Installs the observer that receives inbound messages.
    fn set_message_observer(&self, observer: Arc<dyn MessageObserver>);

    /// Releases the destination's protocol resources. Idempotent.
    fn shutdown(&self);
}

/// Produces bindings, conduits, and destinations for one protocol.
///
/// Factories are stateless beyond shared configuration, which must be
/// effectively immutable once the first endpoint has been created.
pub trait BindingFactory: Send + Sync {
    /// Creates a fresh binding for the given description.
    ///
    /// The returned binding's four lists contain exactly the protocol's
    /// required interceptors in fixed order; the factory never mutates them
    /// after returning.
    fn create_binding(&self, binding_info: &BindingInfo) -> Arc<dyn Binding>;

    /// Creates the initiating endpoint for the given description.
    ///
    /// Without an explicit target, the target resolves from the endpoint's
    /// default address. May open protocol resources eagerly; fails with a
    /// transport-setup error on invalid addresses or protocol arguments.
    fn conduit(
        &self,
        endpoint: &EndpointInfo,
        target: Option<&EndpointReference>,
    ) -> HermesResult<Arc<dyn Conduit>>;

    /// Creates the receiving endpoint for the given description.
    ///
    /// Same address validation and eager-open semantics as
    /// [`BindingFactory::conduit`].
    fn destination(&self, endpoint: &EndpointInfo) -> HermesResult<Arc<dyn Destination>>;

    /// Returns every address-scheme prefix this factory can service.
    ///
    /// The factory only reports capability; prefix-based dispatch happens in
    /// the [`BindingFactoryRegistry`].
    fn uri_prefixes(&self) -> HashSet<String>;
}

/// Process-wide registry of binding factories, keyed by protocol/binding
/// identifier.
///
/// The registry is the framework's protocol-selection dispatch point: it
/// answers both "which factory owns this binding id" and "which factory can
/// service this inbound address".
#[derive(Default)]
pub struct BindingFactoryRegistry {
    factories: RwLock<HashMap<String, Arc<dyn BindingFactory>>>,
}

impl BindingFactoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a binding identifier, replacing any
    /// previous registration for that identifier.
    pub fn register(&self, binding_id: impl Into<String>, factory: Arc<dyn BindingFactory>) {
        let binding_id = binding_id.into();
        tracing::debug!(binding_id = %binding_id, "registering binding factory");
        self.factories.write().insert(binding_id, factory);
    }

    /// Looks up the factory registered under a binding identifier.
    pub fn factory(&self, binding_id: &str) -> HermesResult<Arc<dyn BindingFactory>> {
        self.factories
            .read()
            .get(binding_id)
            .cloned()
            .ok_or_else(|| HermesError::unknown_binding(binding_id))
    }

    /// Finds a factory that services the given address, by scheme prefix.
    ///
    /// The scheme is everything before the first `:`.
    pub fn factory_for_address(&self, address: &str) -> HermesResult<Arc<dyn BindingFactory>> {
        let scheme = address.split(':').next().unwrap_or_default();
        let factories = self.factories.read();
        for factory in factories.values() {
            if factory.uri_prefixes().contains(scheme) {
                return Ok(Arc::clone(factory));
            }
        }
        Err(HermesError::NoFactoryForAddress {
            address: address.to_string(),
        })
    }

    /// Returns the registered binding identifiers.
    #[must_use]
    pub fn binding_ids(&self) -> Vec<String> {
        self.factories.read().keys().cloned().collect()
    }
}
