//! The inbound/outbound validation interceptor pair.
//!
//! Inbound validation runs at `PreInvoke`, before the call is dispatched to
//! business logic; outbound validation runs at `PreMarshal`, before the
//! return value is serialized. The two coordinate through the exchange's
//! `inbound_validation_failed` flag: a call that already failed validation
//! on the way in is never double-validated or double-faulted on the way out.

use crate::provider::{ConstraintViolation, OperationTarget, ProviderOverride, ValidationProvider};
use hermes_core::{BoxFuture, Fault, Interceptor, Message, Phase};
use std::sync::Arc;

/// Which validation strategy the interceptors call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Validate against the target operation's declared method constraints.
    #[default]
    MethodAware,
    /// Validate only the entity's own constraints.
    BeanConstraintsOnly,
}

/// Extracts the real payload from a wrapped return value before validation.
///
/// Identity by default; frameworks that wrap return values in a generic
/// response envelope inject their own extraction here.
pub type EntityUnwrapper = Arc<dyn Fn(&serde_json::Value) -> serde_json::Value + Send + Sync>;

fn identity_unwrapper() -> EntityUnwrapper {
    Arc::new(|entity: &serde_json::Value| entity.clone())
}

/// Resolves the provider for one call: the exchange override wins, the
/// interceptor's default is the fallback.
fn resolve_provider(
    message: &Message,
    default: &Arc<dyn ValidationProvider>,
) -> Arc<dyn ValidationProvider> {
    message
        .exchange()
        .get::<ProviderOverride>()
        .map_or_else(|| Arc::clone(default), |over| Arc::clone(&over.0))
}

fn validation_fault(violations: Vec<ConstraintViolation>) -> Fault {
    let details = serde_json::to_value(&violations)
        .unwrap_or_else(|_| serde_json::Value::Array(Vec::new()));
    Fault::validation(
        format!("{} constraint(s) violated", violations.len()),
        details,
    )
}

/// Validates call arguments before dispatch. Inbound, phase `PreInvoke`.
///
/// On failure it sets the exchange's `inbound_validation_failed` flag and
/// signals a validation fault; the target is never invoked.
pub struct InboundValidationInterceptor {
    provider: Arc<dyn ValidationProvider>,
    mode: ValidationMode,
}

impl InboundValidationInterceptor {
    /// Creates the interceptor with the process-wide default provider.
    #[must_use]
    pub fn new(provider: Arc<dyn ValidationProvider>) -> Self {
        Self {
            provider,
            mode: ValidationMode::default(),
        }
    }

    /// Sets the validation mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Interceptor for InboundValidationInterceptor {
    fn name(&self) -> &'static str {
        "validation-in"
    }

    fn phase(&self) -> Phase {
        Phase::PreInvoke
    }

    fn handle<'a>(&'a self, message: &'a mut Message) -> BoxFuture<'a, Result<(), Fault>> {
        Box::pin(async move {
            let Some(target) = message.extensions().get::<OperationTarget>().cloned() else {
                tracing::debug!(
                    exchange_id = %message.exchange().id(),
                    "no operation target on message, skipping inbound validation"
                );
                return Ok(());
            };

            let provider = resolve_provider(message, &self.provider);
            let result = match self.mode {
                ValidationMode::BeanConstraintsOnly => {
                    let mut violations = Vec::new();
                    for argument in message.content() {
                        if let Err(mut found) = provider.validate_bean(argument) {
                            violations.append(&mut found);
                        }
                    }
                    if violations.is_empty() {
                        Ok(())
                    } else {
                        Err(violations)
                    }
                }
                ValidationMode::MethodAware => {
                    provider.validate_parameters(&target, message.content())
                }
            };

            match result {
                Ok(()) => Ok(()),
                Err(violations) => {
                    tracing::debug!(
                        operation = %target.operation.name,
                        violations = violations.len(),
                        exchange_id = %message.exchange().id(),
                        "inbound validation failed"
                    );
                    message.exchange().mark_inbound_validation_failed();
                    Err(validation_fault(violations))
                }
            }
        })
    }
}

/// Validates the return value before serialization. Outbound, phase
/// `PreMarshal`.
///
/// Skips entirely unless exactly one content entry is present (the return
/// value) and the exchange's `inbound_validation_failed` flag is clear. It
/// never writes the exchange flag.
pub struct OutboundValidationInterceptor {
    provider: Arc<dyn ValidationProvider>,
    mode: ValidationMode,
    unwrap_entity: EntityUnwrapper,
}

impl OutboundValidationInterceptor {
    /// Creates the interceptor with the process-wide default provider.
    #[must_use]
    pub fn new(provider: Arc<dyn ValidationProvider>) -> Self {
        Self {
            provider,
            mode: ValidationMode::default(),
            unwrap_entity: identity_unwrapper(),
        }
    }

    /// Sets the validation mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replaces the entity-unwrapping strategy.
    #[must_use]
    pub fn with_entity_unwrapper(mut self, unwrap_entity: EntityUnwrapper) -> Self {
        self.unwrap_entity = unwrap_entity;
        self
    }
}

impl Interceptor for OutboundValidationInterceptor {
    fn name(&self) -> &'static str {
        "validation-out"
    }

    fn phase(&self) -> Phase {
        Phase::PreMarshal
    }

    fn handle<'a>(&'a self, message: &'a mut Message) -> BoxFuture<'a, Result<(), Fault>> {
        Box::pin(async move {
            if message.content().len() != 1 {
                tracing::debug!(
                    content = message.content().len(),
                    "no single return value, skipping outbound validation"
                );
                return Ok(());
            }
            if message.exchange().inbound_validation_failed() {
                tracing::debug!(
                    exchange_id = %message.exchange().id(),
                    "inbound validation already failed, skipping outbound validation"
                );
                return Ok(());
            }

            let entity = (self.unwrap_entity)(&message.content()[0]);
            let provider = resolve_provider(message, &self.provider);
            let result = match self.mode {
                ValidationMode::BeanConstraintsOnly => provider.validate_bean(&entity),
                ValidationMode::MethodAware => {
                    let Some(target) = message.extensions().get::<OperationTarget>() else {
                        tracing::debug!(
                            "no operation target on message, skipping outbound validation"
                        );
                        return Ok(());
                    };
                    provider.validate_return_value(target, &entity)
                }
            };

            result.map_err(|violations| {
                tracing::debug!(
                    violations = violations.len(),
                    exchange_id = %message.exchange().id(),
                    "outbound validation failed"
                );
                validation_fault(violations)
            })
        })
    }
}
