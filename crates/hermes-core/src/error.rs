//! Error types for the Hermes pipeline.
//!
//! Two distinct shapes exist on purpose:
//!
//! - [`HermesError`] — setup and configuration failures raised synchronously
//!   from factories and endpoints. These surface to the dispatch framework as
//!   a failed call attempt and are never routed through a chain.
//! - [`Fault`] — a structured, serializable fault signaled by an interceptor
//!   during chain execution. Faults halt the current chain and transfer
//!   control to the paired fault chain.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`HermesError`].
pub type HermesResult<T> = Result<T, HermesError>;

/// Standard error type for Hermes setup and configuration paths.
#[derive(Error, Debug)]
pub enum HermesError {
    /// Endpoint or transport setup failed (malformed address, unreachable
    /// registry, unsupported scheme).
    #[error("Transport setup error: {message}")]
    TransportSetup {
        /// Human-readable error message.
        message: String,
        /// The endpoint address that failed, if known.
        address: Option<String>,
    },

    /// A configuration mutation was rejected, e.g. after the factory's
    /// configuration was frozen by the first endpoint creation.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable error message.
        message: String,
    },

    /// No factory is registered for the requested binding identifier.
    #[error("Unknown binding: {binding_id}")]
    UnknownBinding {
        /// The binding/protocol identifier that was looked up.
        binding_id: String,
    },

    /// No registered factory services the given address prefix.
    #[error("No binding factory services address: {address}")]
    NoFactoryForAddress {
        /// The address that could not be dispatched.
        address: String,
    },

    /// Internal pipeline error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error, if any.
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl HermesError {
    /// Creates a transport setup error.
    #[must_use]
    pub fn transport_setup(message: impl Into<String>) -> Self {
        Self::TransportSetup {
            message: message.into(),
            address: None,
        }
    }

    /// Creates a transport setup error carrying the offending address.
    #[must_use]
    pub fn transport_setup_for(message: impl Into<String>, address: impl Into<String>) -> Self {
        Self::TransportSetup {
            message: message.into(),
            address: Some(address.into()),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an unknown-binding error.
    #[must_use]
    pub fn unknown_binding(binding_id: impl Into<String>) -> Self {
        Self::UnknownBinding {
            binding_id: binding_id.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Machine-readable classification of a chain fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultCode {
    /// Constraint validation failed; details carry the violations.
    Validation,
    /// Protocol encode/decode failed (missing or garbled payload).
    Protocol,
    /// The invoked target raised an application-level fault.
    Application,
    /// Pipeline-internal failure during chain execution.
    Runtime,
}

impl FaultCode {
    /// Returns the code name used in logs and wire payloads.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Protocol => "protocol",
            Self::Application => "application",
            Self::Runtime => "runtime",
        }
    }
}

impl std::fmt::Display for FaultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A structured fault signaled by an interceptor during chain execution.
///
/// Faults are serializable so fault-encoding interceptors can render them
/// onto the wire without knowing who raised them.
///
/// # Example
///
/// ```
/// use hermes_core::{Fault, FaultCode};
///
/// let fault = Fault::protocol("payload truncated");
/// assert_eq!(fault.code, FaultCode::Protocol);
/// ```
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[error("{code} fault: {message}")]
pub struct Fault {
    /// Machine-readable fault classification.
    pub code: FaultCode,
    /// Human-readable fault message.
    pub message: String,
    /// Structured details (e.g. constraint violations), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl Fault {
    /// Creates a fault with the given code and message.
    #[must_use]
    pub fn new(code: FaultCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Creates a validation fault carrying structured violation details.
    #[must_use]
    pub fn validation(message: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            code: FaultCode::Validation,
            message: message.into(),
            details: Some(details),
        }
    }

    /// Creates a protocol fault.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(FaultCode::Protocol, message)
    }

    /// Creates an application fault.
    #[must_use]
    pub fn application(message: impl Into<String>) -> Self {
        Self::new(FaultCode::Application, message)
    }

    /// Creates a runtime fault.
    #[must_use]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(FaultCode::Runtime, message)
    }

    /// Attaches structured details to this fault.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_setup_error_carries_address() {
        let error = HermesError::transport_setup_for("bad scheme", "bogus:thing");
        match error {
            HermesError::TransportSetup { address, .. } => {
                assert_eq!(address.as_deref(), Some("bogus:thing"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_internal_error_preserves_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "orb channel closed");
        let error = HermesError::internal_with_source("dispatch failed", io);
        assert_eq!(error.to_string(), "Internal error: dispatch failed");
        let source = std::error::Error::source(&error).expect("source attached");
        assert!(source.to_string().contains("orb channel closed"));

        let plain = HermesError::internal("dispatch failed");
        assert!(std::error::Error::source(&plain).is_none());
    }

    #[test]
    fn test_fault_display() {
        let fault = Fault::validation("constraints violated", serde_json::json!([]));
        assert_eq!(fault.to_string(), "validation fault: constraints violated");
    }

    #[test]
    fn test_fault_serialization_skips_empty_details() {
        let fault = Fault::protocol("garbled payload");
        let json = serde_json::to_string(&fault).expect("fault serializes");
        assert!(json.contains("\"code\":\"protocol\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_fault_round_trips() {
        let fault = Fault::validation(
            "constraints violated",
            serde_json::json!([{"path": "name", "message": "too short"}]),
        );
        let json = serde_json::to_string(&fault).expect("fault serializes");
        let back: Fault = serde_json::from_str(&json).expect("fault deserializes");
        assert_eq!(back.code, FaultCode::Validation);
        assert_eq!(back.details, fault.details);
    }
}
