//! Lock-protected registry for owners that rebind handlers at runtime.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockWriteGuard};

use super::{HandlerRegistry, Registry, Slot};
use crate::error::LookupFault;

/// A [`HandlerRegistry`] shared behind an `Arc<RwLock<_>>`.
///
/// The owner mutates through [`SharedRegistry::write`]; resolvers only ever
/// take a read lock for the duration of a single lookup.
pub struct SharedRegistry<H> {
    inner: Arc<RwLock<HandlerRegistry<H>>>,
}

impl<H> SharedRegistry<H> {
    /// Wrap an existing registry.
    pub fn new(registry: HandlerRegistry<H>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Exclusive access for the owner.
    pub fn write(&self) -> RwLockWriteGuard<'_, HandlerRegistry<H>> {
        self.inner.write()
    }

    /// Run `f` against a read-locked view of the registry.
    pub fn read_with<T>(&self, f: impl FnOnce(&HandlerRegistry<H>) -> T) -> T {
        f(&self.inner.read())
    }
}

impl<H> Clone for SharedRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H> Default for SharedRegistry<H> {
    fn default() -> Self {
        Self::new(HandlerRegistry::new())
    }
}

impl<H> fmt::Debug for SharedRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedRegistry").field(&*self.inner.read()).finish()
    }
}

impl<H: Clone + Send + Sync> Registry for SharedRegistry<H> {
    type Handler = H;

    fn slot(&self, name: &str) -> Result<Option<Slot<H>>, LookupFault> {
        self.inner.read().slot(name)
    }

    fn names(&self) -> Vec<String> {
        self.inner.read().names()
    }
}
