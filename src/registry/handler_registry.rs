//! In-memory handler registry.
//!
//! Populated at startup (directly or from a [`RegistryManifest`](super::RegistryManifest))
//! and read by the resolver afterwards. Alias chains are followed at lookup
//! time, so an alias may be added before its target is registered.

use std::collections::HashMap;
use std::fmt;

use super::{Registry, Slot};
use crate::error::LookupFault;

/// Most alias hops a lookup follows before giving up with `TooDeep`.
pub const MAX_ALIAS_DEPTH: usize = 8;

/// Name → handler map with aliases.
pub struct HandlerRegistry<H> {
    /// Slots indexed by canonical command name
    slots: HashMap<String, Slot<H>>,

    /// Alternative name -> target name
    aliases: HashMap<String, String>,
}

impl<H> HandlerRegistry<H> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Register a handler under `name`.
    ///
    /// Replaces whatever slot the name had before.
    pub fn register(&mut self, name: impl Into<String>, handler: H) {
        let name = name.into();
        if let Some(previous) = self.slots.insert(name.clone(), Slot::Bound(handler)) {
            if previous.is_bound() {
                log::debug!("Registry: replaced handler for command '{}'", name);
            }
        }
    }

    /// Declare `name` without a handler. No-op if the name already has a slot.
    pub fn declare(&mut self, name: impl Into<String>) {
        self.slots.entry(name.into()).or_insert(Slot::Unbound);
    }

    /// Switch `name` off. The name stays enumerable but never resolves.
    pub fn disable(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.slots.insert(
            name.into(),
            Slot::Disabled {
                reason: reason.into(),
            },
        );
    }

    /// Register an alternative name for `target`.
    pub fn add_alias(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.aliases.insert(alias.into(), target.into());
    }

    /// Remove a command's slot. Aliases pointing at it are left dangling.
    pub fn remove(&mut self, name: &str) -> Option<Slot<H>> {
        self.slots.remove(name)
    }

    /// Direct slot access by canonical name (aliases are not followed).
    pub fn get(&self, name: &str) -> Option<&Slot<H>> {
        self.slots.get(name)
    }

    /// Number of command slots (aliases not counted).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the registry has no command slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Sorted `(alias, target)` pairs.
    pub fn aliases(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = self
            .aliases
            .iter()
            .map(|(a, t)| (a.clone(), t.clone()))
            .collect();
        pairs.sort();
        pairs
    }

    /// Names that are declared but have no handler attached.
    pub fn unbound_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Unbound))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Follow aliases from `name` to the canonical command name.
    ///
    /// `Ok(None)` when `name` is neither a command nor an alias.
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> Result<Option<&'a str>, LookupFault> {
        if self.slots.contains_key(name) {
            return Ok(Some(name));
        }

        let mut chain = vec![name.to_string()];
        let mut current = name;
        while let Some(target) = self.aliases.get(current) {
            if chain.iter().any(|seen| seen == target) {
                chain.push(target.clone());
                return Err(LookupFault::AliasCycle { chain });
            }
            if chain.len() > MAX_ALIAS_DEPTH {
                chain.push(target.clone());
                return Err(LookupFault::TooDeep { chain });
            }
            if self.slots.contains_key(target.as_str()) {
                return Ok(Some(target.as_str()));
            }
            chain.push(target.clone());
            current = target.as_str();
        }

        if chain.len() == 1 {
            Ok(None)
        } else {
            Err(LookupFault::DanglingAlias {
                alias: chain[chain.len() - 2].clone(),
                target: current.to_string(),
            })
        }
    }

    /// Check every alias chain up front. Returns `(alias, fault)` for each
    /// alias that would fail at lookup time.
    pub fn validate(&self) -> Vec<(String, LookupFault)> {
        let mut faults: Vec<_> = self
            .aliases
            .keys()
            .filter_map(|alias| {
                self.canonical_name(alias)
                    .err()
                    .map(|fault| (alias.clone(), fault))
            })
            .collect();
        faults.sort_by(|a, b| a.0.cmp(&b.0));
        faults
    }
}

impl<H> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for HandlerRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.slots.keys().collect();
        names.sort();
        f.debug_struct("HandlerRegistry")
            .field("commands", &names)
            .field("aliases", &self.aliases.len())
            .finish()
    }
}

impl<H: Clone + Send + Sync> Registry for HandlerRegistry<H> {
    type Handler = H;

    fn slot(&self, name: &str) -> Result<Option<Slot<H>>, LookupFault> {
        let canonical = self.canonical_name(name)?;
        Ok(canonical.and_then(|c| self.slots.get(c).cloned()))
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.slots.keys().cloned().collect();
        names.sort();
        names
    }
}
