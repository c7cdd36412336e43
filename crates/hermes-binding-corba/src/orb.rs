//! ORB configuration and the protocol resource handle.
//!
//! The object-request-broker runtime itself is a collaborator; [`OrbHandle`]
//! owns its lifecycle from the pipeline's side: initialized eagerly when a
//! conduit or destination is created, released through the endpoint's own
//! close/shutdown, never through the factory.

use hermes_core::{HermesError, HermesResult};
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared ORB runtime arguments for one factory.
///
/// Mutable only until the factory freezes it at the first endpoint creation;
/// see `CorbaBindingFactory`.
#[derive(Debug, Clone, Default)]
pub struct OrbConfig {
    /// The ORB implementation class to load.
    pub orb_class: Option<String>,
    /// The singleton ORB implementation class to load.
    pub orb_singleton_class: Option<String>,
    /// Arguments passed to ORB initialization.
    pub orb_args: Vec<String>,
}

/// The protocol resource owned by one CORBA conduit or destination.
///
/// Initialization is eager: creating the endpoint opens the handle. Release
/// is idempotent.
#[derive(Debug)]
pub struct OrbHandle {
    address: String,
    orb_args: Vec<String>,
    open: AtomicBool,
}

impl OrbHandle {
    /// Initializes a handle for the given (already validated) address.
    pub(crate) fn initialize(address: &str, config: &OrbConfig) -> HermesResult<Self> {
        if address.is_empty() {
            return Err(HermesError::transport_setup("empty endpoint address"));
        }
        tracing::info!(
            address = %address,
            orb_class = config.orb_class.as_deref().unwrap_or("<default>"),
            args = config.orb_args.len(),
            "initializing ORB handle"
        );
        Ok(Self {
            address: address.to_string(),
            orb_args: config.orb_args.clone(),
            open: AtomicBool::new(true),
        })
    }

    /// Returns the address this handle was opened for.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the ORB arguments the handle was initialized with.
    #[must_use]
    pub fn orb_args(&self) -> &[String] {
        &self.orb_args
    }

    /// Returns `true` until [`OrbHandle::release`] is called.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Releases the handle. Idempotent.
    pub fn release(&self) {
        if self.open.swap(false, Ordering::AcqRel) {
            tracing::info!(address = %self.address, "releasing ORB handle");
        }
    }
}
