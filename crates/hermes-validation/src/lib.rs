//! # Hermes Validation
//!
//! Constraint-validation interceptors for the Hermes pipeline.
//!
//! This crate orchestrates *when* validation runs, not how constraints are
//! checked; the engine behind [`ValidationProvider`] is a collaborator.
//!
//! - [`InboundValidationInterceptor`] - validates call arguments at `PreInvoke`
//! - [`OutboundValidationInterceptor`] - validates the return value at `PreMarshal`
//! - [`ProviderOverride`] - per-call provider substitution via the exchange

#![doc(html_root_url = "https://docs.rs/hermes-validation/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod interceptor;
mod provider;

pub use interceptor::{
    EntityUnwrapper, InboundValidationInterceptor, OutboundValidationInterceptor, ValidationMode,
};
pub use provider::{ConstraintViolation, OperationTarget, ProviderOverride, ValidationProvider};
