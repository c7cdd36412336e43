//! The validation-provider contract.
//!
//! The constraint engine itself (how constraints are declared and checked)
//! is a collaborator; the pipeline only decides *when* validation runs and
//! *what* it is given. A provider exposes two strategies: bean-only
//! (validate an entity's own constraints) and method-aware (validate against
//! the target operation's declared constraints).

use hermes_core::OperationInfo;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;

/// One violated constraint, as reported by the validation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// Path to the violating value (e.g. `greet.arg0.name`).
    pub path: String,
    /// Human-readable description of the violation.
    pub message: String,
    /// The offending value, if the engine reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_value: Option<serde_json::Value>,
}

impl ConstraintViolation {
    /// Creates a violation.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            invalid_value: None,
        }
    }

    /// Attaches the offending value.
    #[must_use]
    pub fn with_invalid_value(mut self, value: serde_json::Value) -> Self {
        self.invalid_value = Some(value);
        self
    }
}

/// The resource-instance and operation pair method-aware validation runs
/// against.
///
/// The dispatch framework stores this on the message as a typed extension
/// before the validation interceptors run.
#[derive(Clone)]
pub struct OperationTarget {
    /// The service object the call dispatches to.
    pub instance: Arc<dyn Any + Send + Sync>,
    /// The operation being invoked.
    pub operation: OperationInfo,
}

impl OperationTarget {
    /// Creates a target.
    #[must_use]
    pub fn new(instance: Arc<dyn Any + Send + Sync>, operation: OperationInfo) -> Self {
        Self {
            instance,
            operation,
        }
    }
}

impl std::fmt::Debug for OperationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationTarget")
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

/// The pluggable validation capability.
///
/// `Err` carries the violated constraints; an empty violation list is never
/// returned as an error.
pub trait ValidationProvider: Send + Sync {
    /// Validates an entity's own constraints (bean-only strategy).
    fn validate_bean(&self, entity: &serde_json::Value) -> Result<(), Vec<ConstraintViolation>>;

    /// Validates call arguments against the target operation's declared
    /// parameter constraints (method-aware strategy).
    fn validate_parameters(
        &self,
        target: &OperationTarget,
        arguments: &[serde_json::Value],
    ) -> Result<(), Vec<ConstraintViolation>>;

    /// Validates a return value against the target operation's declared
    /// return constraints (method-aware strategy).
    fn validate_return_value(
        &self,
        target: &OperationTarget,
        entity: &serde_json::Value,
    ) -> Result<(), Vec<ConstraintViolation>>;
}

/// A per-call provider override, stored on the exchange.
///
/// When present, both validation interceptors use it instead of their
/// default provider. This allows per-call substitution (testing,
/// tenant-specific rules) without global reconfiguration.
#[derive(Clone)]
pub struct ProviderOverride(pub Arc<dyn ValidationProvider>);
