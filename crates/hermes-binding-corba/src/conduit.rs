//! The CORBA conduit: the call-initiating protocol endpoint.

use crate::address;
use crate::orb::{OrbConfig, OrbHandle};
use hermes_core::{Conduit, EndpointInfo, EndpointReference, HermesError, HermesResult, Message};
use std::sync::atomic::{AtomicBool, Ordering};

/// The initiating side of a CORBA call.
///
/// Opened eagerly from a frozen ORB configuration snapshot; released via
/// [`Conduit::close`], not through the factory.
pub struct CorbaConduit {
    endpoint: EndpointInfo,
    target: EndpointReference,
    orb: OrbHandle,
    closed: AtomicBool,
}

impl CorbaConduit {
    /// Opens a conduit. Without an explicit target, the target resolves from
    /// the endpoint's default address.
    pub(crate) fn open(
        endpoint: &EndpointInfo,
        target: Option<&EndpointReference>,
        config: &OrbConfig,
    ) -> HermesResult<Self> {
        let target = target.cloned().unwrap_or_else(|| EndpointReference::from_endpoint(endpoint));
        address::validate(&target.address)?;
        let orb = OrbHandle::initialize(&target.address, config)?;
        tracing::info!(
            service = %endpoint.service_name,
            target = %target.address,
            "opened CORBA conduit"
        );
        Ok(Self {
            endpoint: endpoint.clone(),
            target,
            orb,
            closed: AtomicBool::new(false),
        })
    }

    /// Returns the endpoint this conduit was created for.
    #[must_use]
    pub fn endpoint(&self) -> &EndpointInfo {
        &self.endpoint
    }

    /// Returns `true` until the conduit is closed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire) && self.orb.is_open()
    }
}

impl Conduit for CorbaConduit {
    fn target(&self) -> &EndpointReference {
        &self.target
    }

    fn prepare(&self, message: &mut Message) -> HermesResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(HermesError::transport_setup_for(
                "conduit is closed",
                self.target.address.clone(),
            ));
        }
        message.extensions_mut().insert(self.target.clone());
        Ok(())
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.orb.release();
            tracing::info!(target = %self.target.address, "closed CORBA conduit");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_core::{Direction, Exchange};

    fn endpoint() -> EndpointInfo {
        EndpointInfo::new("GreeterService", "corba", "corba:Greeter")
    }

    #[test]
    fn test_target_resolves_from_endpoint_default() {
        let conduit = CorbaConduit::open(&endpoint(), None, &OrbConfig::default()).expect("opens");
        assert_eq!(conduit.target().address, "corba:Greeter");
        assert!(conduit.is_open());
    }

    #[test]
    fn test_explicit_target_wins() {
        let target = EndpointReference::new("ior:00010203");
        let conduit =
            CorbaConduit::open(&endpoint(), Some(&target), &OrbConfig::default()).expect("opens");
        assert_eq!(conduit.target().address, "ior:00010203");
    }

    #[test]
    fn test_malformed_target_is_setup_error() {
        let target = EndpointReference::new("bogus:thing");
        assert!(matches!(
            CorbaConduit::open(&endpoint(), Some(&target), &OrbConfig::default()),
            Err(HermesError::TransportSetup { .. })
        ));
    }

    #[test]
    fn test_prepare_stamps_target_and_close_is_idempotent() {
        let conduit = CorbaConduit::open(&endpoint(), None, &OrbConfig::default()).expect("opens");

        let mut message = Message::new(Exchange::new(), Direction::Out);
        conduit.prepare(&mut message).expect("prepares");
        assert_eq!(
            message.extensions().get::<EndpointReference>(),
            Some(conduit.target())
        );

        conduit.close();
        conduit.close();
        assert!(!conduit.is_open());
        assert!(conduit.prepare(&mut message).is_err());
    }
}
