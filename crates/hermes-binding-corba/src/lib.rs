//! # Hermes CORBA Binding
//!
//! A CORBA-style protocol binding for the Hermes pipeline.
//!
//! The factory produces bindings whose four interceptor lists carry the
//! protocol's fixed encode/decode and fault-translation steps, plus conduits
//! and destinations wrapping an ORB resource handle. Addresses use the
//! `IOR:`/`ior:`/`file:`/`relfile:`/`corba:` schemes.

#![doc(html_root_url = "https://docs.rs/hermes-binding-corba/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod address;
mod binding;
mod conduit;
mod destination;
mod factory;
mod orb;
mod wire;

pub use binding::CorbaBinding;
pub use conduit::CorbaConduit;
pub use destination::CorbaDestination;
pub use factory::{CorbaBindingFactory, CORBA_BINDING_ID, LEGACY_CORBA_NAMESPACE};
pub use orb::{OrbConfig, OrbHandle};
pub use wire::{
    CorbaDecodeInterceptor, CorbaEncodeInterceptor, CorbaFaultDecodeInterceptor,
    CorbaFaultEncodeInterceptor, TransportPayload,
};
