//! # Hermes
//!
//! **Pluggable protocol-binding pipeline for Themis service middleware**
//!
//! Hermes transports an abstract service invocation (a method call with
//! arguments and a return value) over pluggable wire protocols, passing
//! every message through an ordered, named-phase chain of interceptors.
//!
//! - **Protocol pluggability** – new wire protocols implement the binding
//!   traits without touching the invocation model
//! - **Deterministic ordering** – inbound, outbound, and fault chains run in
//!   strict phase order with stable same-phase ordering
//! - **Cross-direction coordination** – exchange-scoped state lets inbound
//!   validation failure suppress redundant outbound validation
//!
//! ## Pipeline
//!
//! ```text
//! Inbound:  Receive → Decode → Unmarshal → PreInvoke → Invoke
//! Outbound: Setup → PreMarshal → Marshal → Encode → Send
//! ```
//!
//! A fault at any point halts the current chain and routes the message to
//! the paired fault chain; a fault during fault processing is terminal.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hermes::prelude::*;
//! use std::sync::Arc;
//!
//! let runtime = Runtime::builder()
//!     .extension_registry(Arc::new(InMemoryExtensionRegistry::new()))
//!     .build();
//!
//! let registry = BindingFactoryRegistry::new();
//! registry.register(CORBA_BINDING_ID, Arc::new(CorbaBindingFactory::new(&runtime)));
//!
//! let factory = registry.factory(CORBA_BINDING_ID)?;
//! let binding = factory.create_binding(&binding_info);
//! let chain = Chain::assemble(
//!     Direction::In,
//!     &PhaseRegistry::new(),
//!     &[binding.interceptors(Direction::In)],
//! );
//! ```

#![doc(html_root_url = "https://docs.rs/hermes/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use hermes_core as core;

// Re-export validation interceptors
pub use hermes_validation as validation;

// Re-export the CORBA binding
pub use hermes_binding_corba as corba;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use hermes::prelude::*;
/// ```
pub mod prelude {
    pub use hermes_core::{
        Binding, BindingFactory, BindingFactoryRegistry, BindingInfo, BoxFuture, Chain,
        ChainOutcome, Conduit, Destination, Direction, EndpointInfo, EndpointReference, Envelope,
        Exchange, ExchangeId, ExtensionRegistry, Fault, FaultCode, HermesError, HermesResult,
        InMemoryExtensionRegistry, Interceptor, Message, MessageId, MessageObserver,
        OperationInfo, OperationName, Phase, PhaseRegistry, QName, Runtime,
    };

    // Re-export the validation pair and provider contract
    pub use hermes_validation::{
        ConstraintViolation, InboundValidationInterceptor, OperationTarget,
        OutboundValidationInterceptor, ProviderOverride, ValidationMode, ValidationProvider,
    };

    // Re-export the CORBA binding surface
    pub use hermes_binding_corba::{
        CorbaBindingFactory, OrbConfig, TransportPayload, CORBA_BINDING_ID,
    };
}
