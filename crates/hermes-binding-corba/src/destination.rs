//! The CORBA destination: the call-receiving protocol endpoint.

use crate::address;
use crate::orb::{OrbConfig, OrbHandle};
use hermes_core::{Destination, EndpointInfo, HermesResult, Message, MessageObserver};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The receiving side of a CORBA endpoint.
///
/// Holds the observer the dispatch framework installs; the transport glue
/// calls [`CorbaDestination::dispatch`] for each arriving message.
pub struct CorbaDestination {
    endpoint: EndpointInfo,
    orb: OrbHandle,
    observer: RwLock<Option<Arc<dyn MessageObserver>>>,
    shut_down: AtomicBool,
}

impl CorbaDestination {
    /// Opens a destination for the endpoint's address.
    pub(crate) fn open(endpoint: &EndpointInfo, config: &OrbConfig) -> HermesResult<Self> {
        address::validate(&endpoint.address)?;
        let orb = OrbHandle::initialize(&endpoint.address, config)?;
        tracing::info!(
            service = %endpoint.service_name,
            address = %endpoint.address,
            "opened CORBA destination"
        );
        Ok(Self {
            endpoint: endpoint.clone(),
            orb,
            observer: RwLock::new(None),
            shut_down: AtomicBool::new(false),
        })
    }

    /// Returns `true` until the destination is shut down.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.shut_down.load(Ordering::Acquire) && self.orb.is_open()
    }

    /// Hands an arriving message to the installed observer.
    ///
    /// Messages arriving with no observer installed, or after shutdown, are
    /// dropped with a warning; the transport owns any retry.
    pub fn dispatch(&self, message: Message) {
        if self.shut_down.load(Ordering::Acquire) {
            tracing::warn!(
                address = %self.endpoint.address,
                "message arrived after shutdown, dropping"
            );
            return;
        }
        let observer = self.observer.read().clone();
        match observer {
            Some(observer) => observer.on_message(message),
            None => tracing::warn!(
                address = %self.endpoint.address,
                "no message observer installed, dropping message"
            ),
        }
    }
}

impl Destination for CorbaDestination {
    fn endpoint(&self) -> &EndpointInfo {
        &self.endpoint
    }

    fn set_message_observer(&self, observer: Arc<dyn MessageObserver>) {
        *self.observer.write() = Some(observer);
    }

    fn shutdown(&self) {
        if !self.shut_down.swap(true, Ordering::AcqRel) {
            self.orb.release();
            tracing::info!(address = %self.endpoint.address, "shut down CORBA destination");
        }
    }
}
