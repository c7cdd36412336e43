//! The message: the mutable per-direction carrier of one unit of processing.
//!
//! A [`Message`] is owned exclusively by the chain executing it. It carries
//! the call content (arguments inbound, the return value outbound), an
//! optional fault slot populated when control transfers to a fault chain,
//! and a typed extension bag for protocol metadata.

use crate::error::Fault;
use crate::exchange::Exchange;
use crate::phase::Direction;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use uuid::Uuid;

/// A unique identifier for one message, using UUID v7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new unique message ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A TypeId-keyed bag of protocol metadata attached to a message.
///
/// Bindings use this to pass wire envelopes, transport payloads, and
/// operation targets between interceptors without the core knowing their
/// shapes.
#[derive(Default)]
pub struct Extensions {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl Extensions {
    /// Creates an empty extension bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an extension, returning the previous value of the same type
    /// if one was present.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.entries
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Returns a reference to the extension of the given type.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// Returns a mutable reference to the extension of the given type.
    pub fn get_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.entries
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut::<T>())
    }

    /// Removes and returns the extension of the given type.
    pub fn remove<T: Any + Send + Sync>(&mut self) -> Option<T> {
        self.entries
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Returns `true` if an extension of the given type is present.
    #[must_use]
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }
}

/// The mutable carrier of one unit of processing in one direction.
///
/// Content semantics by direction: inbound content is the decoded call
/// arguments; outbound content is the single return value. Entities travel
/// as [`serde_json::Value`], the platform's lingua franca for
/// schema-validated payloads.
#[derive(Debug)]
pub struct Message {
    id: MessageId,
    direction: Direction,
    exchange: Exchange,
    content: Vec<serde_json::Value>,
    fault: Option<Fault>,
    extensions: Extensions,
}

impl Message {
    /// Creates an empty message for the given direction, correlated to the
    /// given exchange.
    #[must_use]
    pub fn new(exchange: Exchange, direction: Direction) -> Self {
        Self {
            id: MessageId::new(),
            direction,
            exchange,
            content: Vec::new(),
            fault: None,
            extensions: Extensions::new(),
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the message direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the exchange this message belongs to.
    #[must_use]
    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    /// Returns the call content (arguments inbound, return value outbound).
    #[must_use]
    pub fn content(&self) -> &[serde_json::Value] {
        &self.content
    }

    /// Returns the call content mutably.
    pub fn content_mut(&mut self) -> &mut Vec<serde_json::Value> {
        &mut self.content
    }

    /// Replaces the call content.
    pub fn set_content(&mut self, content: Vec<serde_json::Value>) {
        self.content = content;
    }

    /// Returns the fault carried by this message, if control has transferred
    /// to a fault chain.
    #[must_use]
    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    /// Stores the fault that halted the paired non-fault chain.
    pub fn set_fault(&mut self, fault: Fault) {
        self.fault = Some(fault);
    }

    /// Returns the typed extension bag.
    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Returns the typed extension bag mutably.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}
