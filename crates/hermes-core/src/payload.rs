//! Generic payload interceptors: the protocol-agnostic halves every binding
//! installs.
//!
//! A protocol decoder produces an [`Envelope`]; [`ArgumentUnwrapInterceptor`]
//! turns it into call arguments. Symmetrically,
//! [`ReturnWrapInterceptor`] turns the return value back into an envelope for
//! the protocol encoder. Byte-level work stays in the protocol interceptors
//! and the transport.

use crate::error::Fault;
use crate::interceptor::{BoxFuture, Interceptor};
use crate::message::Message;
use crate::phase::Phase;
use serde::{Deserialize, Serialize};

/// The decoded wire-level representation of one call: the operation and its
/// parts.
///
/// Attached to a message as a typed extension by protocol decoders, consumed
/// by [`ArgumentUnwrapInterceptor`]; produced by [`ReturnWrapInterceptor`]
/// for protocol encoders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// The operation this envelope addresses.
    pub operation: String,
    /// The envelope parts (arguments or the return value).
    pub parts: Vec<serde_json::Value>,
}

impl Envelope {
    /// Creates an envelope.
    #[must_use]
    pub fn new(operation: impl Into<String>, parts: Vec<serde_json::Value>) -> Self {
        Self {
            operation: operation.into(),
            parts,
        }
    }
}

/// The operation name recorded on a message while it travels the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationName(pub String);

/// Moves a decoded envelope's parts into the message content and records the
/// operation name. Inbound, phase `Unmarshal`.
#[derive(Debug, Default)]
pub struct ArgumentUnwrapInterceptor;

impl ArgumentUnwrapInterceptor {
    /// Creates the interceptor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Interceptor for ArgumentUnwrapInterceptor {
    fn name(&self) -> &'static str {
        "argument-unwrap"
    }

    fn phase(&self) -> Phase {
        Phase::Unmarshal
    }

    fn handle<'a>(&'a self, message: &'a mut Message) -> BoxFuture<'a, Result<(), Fault>> {
        Box::pin(async move {
            let envelope = message
                .extensions_mut()
                .remove::<Envelope>()
                .ok_or_else(|| Fault::protocol("no envelope to unwrap"))?;
            tracing::debug!(
                operation = %envelope.operation,
                parts = envelope.parts.len(),
                "unwrapping call arguments"
            );
            message
                .extensions_mut()
                .insert(OperationName(envelope.operation));
            message.set_content(envelope.parts);
            Ok(())
        })
    }
}

/// Wraps the message content into an envelope for the protocol encoder.
/// Outbound, phase `Marshal`.
#[derive(Debug, Default)]
pub struct ReturnWrapInterceptor;

impl ReturnWrapInterceptor {
    /// Creates the interceptor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Interceptor for ReturnWrapInterceptor {
    fn name(&self) -> &'static str {
        "return-wrap"
    }

    fn phase(&self) -> Phase {
        Phase::Marshal
    }

    fn handle<'a>(&'a self, message: &'a mut Message) -> BoxFuture<'a, Result<(), Fault>> {
        Box::pin(async move {
            let operation = message
                .extensions()
                .get::<OperationName>()
                .map_or_else(String::new, |name| name.0.clone());
            let parts = message.content().to_vec();
            tracing::debug!(
                operation = %operation,
                parts = parts.len(),
                "wrapping return value"
            );
            message.extensions_mut().insert(Envelope::new(operation, parts));
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::Exchange;
    use crate::phase::Direction;

    #[tokio::test]
    async fn test_unwrap_moves_parts_into_content() {
        let mut message = Message::new(Exchange::new(), Direction::In);
        message.extensions_mut().insert(Envelope::new(
            "greet",
            vec![serde_json::json!("hello"), serde_json::json!(42)],
        ));

        ArgumentUnwrapInterceptor::new()
            .handle(&mut message)
            .await
            .expect("unwrap succeeds");

        assert_eq!(message.content().len(), 2);
        assert_eq!(
            message.extensions().get::<OperationName>(),
            Some(&OperationName("greet".to_string()))
        );
        assert!(!message.extensions().contains::<Envelope>());
    }

    #[tokio::test]
    async fn test_unwrap_without_envelope_is_protocol_fault() {
        let mut message = Message::new(Exchange::new(), Direction::In);
        let fault = ArgumentUnwrapInterceptor::new()
            .handle(&mut message)
            .await
            .expect_err("missing envelope faults");
        assert_eq!(fault.code, crate::FaultCode::Protocol);
    }

    #[tokio::test]
    async fn test_wrap_builds_envelope_from_content() {
        let mut message = Message::new(Exchange::new(), Direction::Out);
        message
            .extensions_mut()
            .insert(OperationName("greet".to_string()));
        message.set_content(vec![serde_json::json!({"greeting": "hi"})]);

        ReturnWrapInterceptor::new()
            .handle(&mut message)
            .await
            .expect("wrap succeeds");

        let envelope = message.extensions().get::<Envelope>().expect("wrapped");
        assert_eq!(envelope.operation, "greet");
        assert_eq!(envelope.parts.len(), 1);
    }
}
