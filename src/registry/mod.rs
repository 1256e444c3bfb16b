//! # Handler Registry
//!
//! The registry is the explicit, statically declared mapping from command
//! name to handler that the resolver consults. Every valid name is
//! enumerable up front; nothing is looked up structurally at runtime.
//!
//! ## Slots
//!
//! Each name maps to a [`Slot`]:
//!
//! - `Bound(handler)`: usable
//! - `Unbound`: declared (usually by a manifest) but no handler attached yet
//! - `Disabled { reason }`: declared and deliberately switched off
//!
//! Resolution is a two-step check: presence ([`Registry::slot`]) followed by
//! usability ([`Slot::into_handler`]).
//!
//! ## Backends
//!
//! - [`HandlerRegistry`]: plain in-memory map, built at startup
//! - [`SharedRegistry`]: `HandlerRegistry` behind a read/write lock, for
//!   owners that rebind handlers at runtime

pub mod handler_registry;
pub mod manifest;
pub mod shared;

use std::sync::Arc;

use crate::error::LookupFault;

pub use handler_registry::{HandlerRegistry, MAX_ALIAS_DEPTH};
pub use manifest::{CommandDecl, RegistryManifest};
pub use shared::SharedRegistry;

/// A registry entry for one command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<H> {
    /// A usable handler.
    Bound(H),
    /// Declared, nothing attached.
    Unbound,
    /// Declared and switched off.
    Disabled { reason: String },
}

impl<H> Slot<H> {
    /// Usability check: unwrap the handler or explain why it is unusable.
    pub fn into_handler(self) -> Result<H, LookupFault> {
        match self {
            Self::Bound(handler) => Ok(handler),
            Self::Unbound => Err(LookupFault::Unbound),
            Self::Disabled { reason } => Err(LookupFault::Disabled { reason }),
        }
    }

    /// Borrowing variant of [`Slot::into_handler`].
    pub fn as_handler(&self) -> Option<&H> {
        match self {
            Self::Bound(handler) => Some(handler),
            _ => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }
}

/// Read-only view of a name → handler mapping.
///
/// Implementations must not mutate observable state from `slot`; the
/// resolver relies on lookups being pure reads.
pub trait Registry: Send + Sync {
    /// Handler type handed back on success. Cloning must yield the same
    /// handler (e.g. an `Arc`), not a copy of its state.
    type Handler: Clone;

    /// Presence test. `Ok(None)` means the name has no slot.
    ///
    /// `Err` is reserved for faults reading the registry itself
    /// (corrupt alias chains, an unreadable backend).
    fn slot(&self, name: &str) -> Result<Option<Slot<Self::Handler>>, LookupFault>;

    /// All command names with a slot, sorted.
    fn names(&self) -> Vec<String>;
}

impl<R: Registry + ?Sized> Registry for &R {
    type Handler = R::Handler;

    fn slot(&self, name: &str) -> Result<Option<Slot<Self::Handler>>, LookupFault> {
        (**self).slot(name)
    }

    fn names(&self) -> Vec<String> {
        (**self).names()
    }
}

impl<R: Registry + ?Sized> Registry for Arc<R> {
    type Handler = R::Handler;

    fn slot(&self, name: &str) -> Result<Option<Slot<Self::Handler>>, LookupFault> {
        (**self).slot(name)
    }

    fn names(&self) -> Vec<String> {
        (**self).names()
    }
}
