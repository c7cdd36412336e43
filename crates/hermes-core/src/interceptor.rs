//! The interceptor contract.
//!
//! An interceptor is a named, phase-tagged unit of processing. Protocol
//! encode/decode steps, validation, and fault translation all implement the
//! same contract; the chain neither knows nor cares which subsystem
//! contributed an interceptor.

use crate::error::Fault;
use crate::message::Message;
use crate::phase::Phase;
use std::future::Future;
use std::pin::Pin;

/// A boxed future, the return shape of object-safe async traits here.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A single phase-tagged processing unit within a chain.
///
/// Implementations mutate the message, read or write the exchange through
/// the message's handle, or signal a [`Fault`] to halt the chain.
///
/// # Example
///
/// ```ignore
/// struct StampInterceptor;
///
/// impl Interceptor for StampInterceptor {
///     fn name(&self) -> &'static str {
///         "stamp"
///     }
///
///     fn phase(&self) -> Phase {
///         Phase::Setup
///     }
///
///     fn handle<'a>(&'a self, message: &'a mut Message) -> BoxFuture<'a, Result<(), Fault>> {
///         Box::pin(async move {
///             message.content_mut().push(serde_json::json!("stamped"));
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Interceptor: Send + Sync + 'static {
    /// Returns the unique name of this interceptor.
    ///
    /// Used for logging and debugging only; names carry no ordering meaning.
    fn name(&self) -> &'static str;

    /// Returns the phase this interceptor runs in.
    fn phase(&self) -> Phase;

    /// Processes the message.
    ///
    /// Returning `Err` halts the current chain and transfers control to the
    /// paired fault chain.
    fn handle<'a>(&'a self, message: &'a mut Message) -> BoxFuture<'a, Result<(), Fault>>;
}
