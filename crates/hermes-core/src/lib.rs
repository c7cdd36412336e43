//! # Hermes Core
//!
//! Core types and traits for the Hermes protocol-binding pipeline.
//!
//! This crate provides the foundational pieces every binding builds on:
//!
//! - [`Phase`], [`Direction`], [`PhaseRegistry`] - the canonical processing timeline
//! - [`Message`], [`Exchange`] - per-call state and request/response correlation
//! - [`Interceptor`], [`Chain`] - the processing contract and phase-sorted execution
//! - [`Binding`], [`BindingFactory`], [`Conduit`], [`Destination`] - the protocol seam
//! - [`ExtensionRegistry`] - description-language extensibility registration
//! - [`Runtime`] - the explicitly passed-down shared context
//! - [`HermesError`], [`Fault`] - setup errors and chain faults

#![doc(html_root_url = "https://docs.rs/hermes-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binding;
mod chain;
mod error;
mod exchange;
mod extension;
mod interceptor;
mod message;
mod payload;
mod phase;
mod runtime;
mod service_model;

pub use binding::{
    Binding, BindingFactory, BindingFactoryRegistry, Conduit, Destination, MessageObserver,
};
pub use chain::{Chain, ChainOutcome};
pub use error::{Fault, FaultCode, HermesError, HermesResult};
pub use exchange::{Exchange, ExchangeId};
pub use extension::{ExtensionError, ExtensionRegistry, InMemoryExtensionRegistry, QName};
pub use interceptor::{BoxFuture, Interceptor};
pub use message::{Extensions, Message, MessageId};
pub use payload::{ArgumentUnwrapInterceptor, Envelope, OperationName, ReturnWrapInterceptor};
pub use phase::{Direction, Phase, PhaseRegistry};
pub use runtime::{Runtime, RuntimeBuilder};
pub use service_model::{
    BindingInfo, BindingInfoBuilder, EndpointInfo, EndpointReference, OperationInfo,
};
