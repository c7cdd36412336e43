//! CORBA protocol interceptors: payload encode/decode and fault translation.
//!
//! The transport attaches a [`TransportPayload`] to inbound messages; the
//! decode interceptor turns it into the generic wire [`Envelope`] the
//! argument-unwrap step consumes. Outbound is symmetric. The fault pair
//! translates between the message fault slot and transport fault payloads.

use hermes_core::{BoxFuture, Envelope, Fault, Interceptor, Message, Phase};

/// The raw bytes exchanged with the transport, attached to a message as a
/// typed extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPayload {
    /// The serialized envelope or fault body.
    pub bytes: Vec<u8>,
}

impl TransportPayload {
    /// Wraps transport bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

/// Decodes the transport payload into a wire envelope. Inbound, phase
/// `Decode`.
#[derive(Debug, Default)]
pub struct CorbaDecodeInterceptor;

impl CorbaDecodeInterceptor {
    /// Creates the interceptor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Interceptor for CorbaDecodeInterceptor {
    fn name(&self) -> &'static str {
        "corba-decode"
    }

    fn phase(&self) -> Phase {
        Phase::Decode
    }

    fn handle<'a>(&'a self, message: &'a mut Message) -> BoxFuture<'a, Result<(), Fault>> {
        Box::pin(async move {
            let payload = message
                .extensions_mut()
                .remove::<TransportPayload>()
                .ok_or_else(|| Fault::protocol("no transport payload to decode"))?;
            let envelope: Envelope = serde_json::from_slice(&payload.bytes)
                .map_err(|e| Fault::protocol(format!("garbled envelope: {e}")))?;
            tracing::debug!(operation = %envelope.operation, "decoded wire envelope");
            message.extensions_mut().insert(envelope);
            Ok(())
        })
    }
}

/// Encodes the wire envelope into a transport payload. Outbound, phase
/// `Encode`.
#[derive(Debug, Default)]
pub struct CorbaEncodeInterceptor;

impl CorbaEncodeInterceptor {
    /// Creates the interceptor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Interceptor for CorbaEncodeInterceptor {
    fn name(&self) -> &'static str {
        "corba-encode"
    }

    fn phase(&self) -> Phase {
        Phase::Encode
    }

    fn handle<'a>(&'a self, message: &'a mut Message) -> BoxFuture<'a, Result<(), Fault>> {
        Box::pin(async move {
            let envelope = message
                .extensions_mut()
                .remove::<Envelope>()
                .ok_or_else(|| Fault::protocol("no envelope to encode"))?;
            let bytes = serde_json::to_vec(&envelope)
                .map_err(|e| Fault::protocol(format!("envelope encoding failed: {e}")))?;
            tracing::debug!(operation = %envelope.operation, bytes = bytes.len(), "encoded wire envelope");
            message.extensions_mut().insert(TransportPayload::new(bytes));
            Ok(())
        })
    }
}

/// Decodes a transport fault payload into the message fault slot. In-fault,
/// phase `Decode`.
///
/// A locally raised fault has no wire payload; in that case the fault
/// already sits in the slot and this interceptor is a no-op.
#[derive(Debug, Default)]
pub struct CorbaFaultDecodeInterceptor;

impl CorbaFaultDecodeInterceptor {
    /// Creates the interceptor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Interceptor for CorbaFaultDecodeInterceptor {
    fn name(&self) -> &'static str {
        "corba-fault-decode"
    }

    fn phase(&self) -> Phase {
        Phase::Decode
    }

    fn handle<'a>(&'a self, message: &'a mut Message) -> BoxFuture<'a, Result<(), Fault>> {
        Box::pin(async move {
            let Some(payload) = message.extensions_mut().remove::<TransportPayload>() else {
                if message.fault().is_some() {
                    tracing::debug!("local fault, nothing to decode");
                    return Ok(());
                }
                return Err(Fault::protocol("no fault payload to decode"));
            };
            let fault: Fault = serde_json::from_slice(&payload.bytes)
                .map_err(|e| Fault::protocol(format!("garbled fault payload: {e}")))?;
            tracing::debug!(fault.code = %fault.code, "decoded wire fault");
            message.set_fault(fault);
            Ok(())
        })
    }
}

/// Renders the message's fault into a transport fault payload. Out-fault,
/// phase `Encode`.
#[derive(Debug, Default)]
pub struct CorbaFaultEncodeInterceptor;

impl CorbaFaultEncodeInterceptor {
    /// Creates the interceptor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Interceptor for CorbaFaultEncodeInterceptor {
    fn name(&self) -> &'static str {
        "corba-fault-encode"
    }

    fn phase(&self) -> Phase {
        Phase::Encode
    }

    fn handle<'a>(&'a self, message: &'a mut Message) -> BoxFuture<'a, Result<(), Fault>> {
        Box::pin(async move {
            let fault = message
                .fault()
                .ok_or_else(|| Fault::runtime("no fault to encode"))?;
            let bytes = serde_json::to_vec(fault)
                .map_err(|e| Fault::protocol(format!("fault encoding failed: {e}")))?;
            tracing::debug!(fault.code = %fault.code, bytes = bytes.len(), "encoded wire fault");
            message.extensions_mut().insert(TransportPayload::new(bytes));
            Ok(())
        })
    }
}
