//! The CORBA binding factory.
//!
//! Produces bindings populated with the protocol's fixed interceptors,
//! opens conduits and destinations from a shared ORB configuration, and
//! registers legacy-namespace compatibility extensors at construction.

use crate::address;
use crate::binding::CorbaBinding;
use crate::conduit::CorbaConduit;
use crate::destination::CorbaDestination;
use crate::orb::OrbConfig;
use crate::wire::{
    CorbaDecodeInterceptor, CorbaEncodeInterceptor, CorbaFaultDecodeInterceptor,
    CorbaFaultEncodeInterceptor,
};
use hermes_core::{
    ArgumentUnwrapInterceptor, Binding, BindingFactory, BindingInfo, Conduit, Destination,
    EndpointInfo, EndpointReference, ExtensionRegistry, HermesError, HermesResult, Interceptor,
    QName, ReturnWrapInterceptor, Runtime,
};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The binding identifier the factory registers under.
pub const CORBA_BINDING_ID: &str = "http://schemas.themisplatform.io/bindings/corba";

/// The alternate namespace older descriptions qualify CORBA extensibility
/// elements with.
pub const LEGACY_CORBA_NAMESPACE: &str = "http://schemas.themisplatform.io/legacy/bindings/corba";

/// The (parent element type, element local name) pairs that need a
/// compatibility mapping under the legacy namespace.
const COMPAT_EXTENSORS: [(&str, &str); 5] = [
    ("Binding", "binding"),
    ("BindingOperation", "operation"),
    ("Definition", "typeMapping"),
    ("Port", "address"),
    ("Port", "policy"),
];

/// Binding factory for the CORBA protocol.
///
/// The shared ORB configuration is mutable only until the first conduit or
/// destination is created; later mutation attempts fail with a
/// configuration error.
pub struct CorbaBindingFactory {
    orb_config: RwLock<OrbConfig>,
    frozen: AtomicBool,
}

impl CorbaBindingFactory {
    /// Creates the factory and registers the legacy-namespace compatibility
    /// extensors against the runtime's extension registry.
    ///
    /// Registrations are independent and best-effort: an individual failure
    /// is logged and skipped, never fatal to the factory.
    #[must_use]
    pub fn new(runtime: &Runtime) -> Self {
        if let Some(registry) = runtime.extension_registry() {
            Self::register_compat_extensors(registry.as_ref());
        } else {
            tracing::debug!("no extension registry configured, skipping compat extensors");
        }
        Self {
            orb_config: RwLock::new(OrbConfig::default()),
            frozen: AtomicBool::new(false),
        }
    }

    fn register_compat_extensors(registry: &dyn ExtensionRegistry) {
        for (parent, local_name) in COMPAT_EXTENSORS {
            let element = QName::new(LEGACY_CORBA_NAMESPACE, local_name);
            if let Err(error) = registry.register(parent, element) {
                tracing::warn!(
                    parent = parent,
                    element = local_name,
                    error = %error,
                    "compat extensor registration failed, skipping"
                );
            }
        }
    }

    /// Sets the ORB implementation class. Fails once the configuration is
    /// frozen.
    pub fn set_orb_class(&self, class: impl Into<String>) -> HermesResult<()> {
        self.mutate(|config| config.orb_class = Some(class.into()))
    }

    /// Sets the singleton ORB implementation class. Fails once the
    /// configuration is frozen.
    pub fn set_orb_singleton_class(&self, class: impl Into<String>) -> HermesResult<()> {
        self.mutate(|config| config.orb_singleton_class = Some(class.into()))
    }

    /// Sets the ORB initialization arguments. Fails once the configuration
    /// is frozen.
    pub fn set_orb_args(&self, args: Vec<String>) -> HermesResult<()> {
        self.mutate(|config| config.orb_args = args)
    }

    /// Returns a snapshot of the current ORB configuration.
    #[must_use]
    pub fn orb_config(&self) -> OrbConfig {
        self.orb_config.read().clone()
    }

    fn mutate(&self, apply: impl FnOnce(&mut OrbConfig)) -> HermesResult<()> {
        if self.frozen.load(Ordering::Acquire) {
            return Err(HermesError::configuration(
                "ORB configuration is frozen after first endpoint creation",
            ));
        }
        apply(&mut self.orb_config.write());
        Ok(())
    }

    /// Freezes the configuration and returns the snapshot endpoints are
    /// built from.
    fn freeze(&self) -> OrbConfig {
        if !self.frozen.swap(true, Ordering::AcqRel) {
            tracing::debug!("freezing ORB configuration");
        }
        self.orb_config.read().clone()
    }
}

impl BindingFactory for CorbaBindingFactory {
    fn create_binding(&self, binding_info: &BindingInfo) -> Arc<dyn Binding> {
        // List population order follows the protocol's fixed set; the chain
        // assembler does the phase sorting.
        let in_fault: Vec<Arc<dyn Interceptor>> = vec![Arc::new(CorbaFaultDecodeInterceptor::new())];
        let out_fault: Vec<Arc<dyn Interceptor>> =
            vec![Arc::new(CorbaFaultEncodeInterceptor::new())];
        let out: Vec<Arc<dyn Interceptor>> = vec![
            Arc::new(ReturnWrapInterceptor::new()),
            Arc::new(CorbaEncodeInterceptor::new()),
        ];
        let inbound: Vec<Arc<dyn Interceptor>> = vec![
            Arc::new(ArgumentUnwrapInterceptor::new()),
            Arc::new(CorbaDecodeInterceptor::new()),
        ];
        Arc::new(CorbaBinding::new(
            binding_info.clone(),
            inbound,
            out,
            in_fault,
            out_fault,
        ))
    }

    fn conduit(
        &self,
        endpoint: &EndpointInfo,
        target: Option<&EndpointReference>,
    ) -> HermesResult<Arc<dyn Conduit>> {
        let config = self.freeze();
        Ok(Arc::new(CorbaConduit::open(endpoint, target, &config)?))
    }

    fn destination(&self, endpoint: &EndpointInfo) -> HermesResult<Arc<dyn Destination>> {
        let config = self.freeze();
        Ok(Arc::new(CorbaDestination::open(endpoint, &config)?))
    }

    fn uri_prefixes(&self) -> HashSet<String> {
        address::URI_PREFIXES
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}
