//! Command resolver. Translates a runtime-supplied command name into a
//! handler from a [`Registry`].
//!
//! Every failure path (name not registered, handler unbound or disabled,
//! broken alias chain, unreadable registry) converges to a single
//! [`ResolveError::HandlerNotFound`] carrying the requested name. The
//! underlying [`LookupFault`] is written to the configured [`WarnSink`] and
//! then dropped; callers never see it.
//!
//! # Example
//!
//! ```
//! use command_resolver::registry::HandlerRegistry;
//! use command_resolver::resolver::CommandResolver;
//! use command_resolver::sink::MemorySink;
//! use std::sync::Arc;
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register("ping", "ping-handler");
//!
//! let sink = Arc::new(MemorySink::new());
//! let resolver = CommandResolver::new(&registry).with_sink(sink.clone());
//!
//! assert_eq!(resolver.resolve("ping").unwrap(), "ping-handler");
//! assert!(resolver.resolve("pong").is_err());
//! assert_eq!(sink.len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{LookupFault, ResolveError};
use crate::registry::Registry;
use crate::sink::{LogSink, WarnSink};

/// Resolves command names against a borrowed registry.
///
/// The resolver never owns or mutates the registry. It is stateless between
/// calls and can be shared across threads whenever the registry is `Sync`.
pub struct CommandResolver<'a, R: ?Sized> {
    registry: &'a R,
    sink: Option<Arc<dyn WarnSink>>,
}

impl<'a, R: Registry + ?Sized> CommandResolver<'a, R> {
    /// Create a resolver with no warning sink.
    pub fn new(registry: &'a R) -> Self {
        Self {
            registry,
            sink: None,
        }
    }

    /// Report failed lookups to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn WarnSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Report failed lookups through `log::warn!`.
    pub fn with_log_sink(self) -> Self {
        self.with_sink(Arc::new(LogSink))
    }

    /// The registry this resolver reads from.
    pub fn registry(&self) -> &'a R {
        self.registry
    }

    /// Resolve `name` to its handler.
    ///
    /// Empty or malformed names are plain misses. A miss is never retried:
    /// the registry is unchanged between attempts, so the outcome would be
    /// the same.
    pub fn resolve(&self, name: &str) -> Result<R::Handler, ResolveError> {
        self.lookup(name).map_err(|fault| {
            if let Some(sink) = &self.sink {
                sink.warn(&format!(
                    "Failed to get handler for command {}. Error {}",
                    name, fault
                ));
            }
            ResolveError::not_found(name)
        })
    }

    /// Presence test followed by usability check, without logging or
    /// normalizing the fault.
    pub fn lookup(&self, name: &str) -> Result<R::Handler, LookupFault> {
        let slot = self
            .registry
            .slot(name)?
            .ok_or(LookupFault::NotRegistered)?;
        slot.into_handler()
    }

    /// Whether `name` currently resolves to a usable handler.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// Every command name the registry knows, sorted.
    pub fn names(&self) -> Vec<String> {
        self.registry.names()
    }
}

impl<R: ?Sized> Clone for CommandResolver<'_, R> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry,
            sink: self.sink.clone(),
        }
    }
}

impl<R: ?Sized> fmt::Debug for CommandResolver<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandResolver")
            .field("sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::registry::{HandlerRegistry, SharedRegistry, Slot};
    use crate::sink::MemorySink;

    type Handler = Arc<dyn Fn() -> &'static str + Send + Sync>;

    fn handler(reply: &'static str) -> Handler {
        Arc::new(move || reply)
    }

    fn ping_registry() -> (HandlerRegistry<Handler>, Handler) {
        let ping = handler("pong");
        let mut reg = HandlerRegistry::new();
        reg.register("ping", Arc::clone(&ping));
        (reg, ping)
    }

    /// A backend whose reads always fail.
    struct UnreadableRegistry;

    impl Registry for UnreadableRegistry {
        type Handler = Handler;

        fn slot(&self, _name: &str) -> Result<Option<Slot<Handler>>, LookupFault> {
            Err(LookupFault::Unreadable("backing store offline".to_string()))
        }

        fn names(&self) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn test_resolve_returns_stored_handler() {
        let (reg, ping) = ping_registry();
        let sink = Arc::new(MemorySink::new());
        let resolver = CommandResolver::new(&reg).with_sink(sink.clone());

        let resolved = resolver.resolve("ping").unwrap();
        assert!(Arc::ptr_eq(&resolved, &ping));
        assert_eq!(resolved(), "pong");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_resolve_unknown_name() {
        let (reg, _) = ping_registry();
        let resolver = CommandResolver::new(&reg);

        let err = resolver.resolve("pong").err().unwrap();
        assert_eq!(err, ResolveError::not_found("pong"));
        assert_eq!(err.name(), "pong");
    }

    #[test]
    fn test_resolve_on_empty_registry() {
        let reg: HandlerRegistry<Handler> = HandlerRegistry::new();
        let resolver = CommandResolver::new(&reg);
        let err = resolver.resolve("anything").err().unwrap();
        assert_eq!(err.name(), "anything");
    }

    #[test]
    fn test_empty_name_is_not_found() {
        let (reg, _) = ping_registry();
        let resolver = CommandResolver::new(&reg);
        assert_eq!(resolver.resolve("").err(), Some(ResolveError::not_found("")));
    }

    #[test]
    fn test_miss_emits_exactly_one_warning() {
        let (reg, _) = ping_registry();
        let sink = Arc::new(MemorySink::new());
        let resolver = CommandResolver::new(&reg).with_sink(sink.clone());

        assert!(resolver.resolve("missing").is_err());

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].contains("missing"));
        assert!(entries[0].contains("not registered"));
    }

    #[test]
    fn test_miss_without_sink_is_silent() {
        let (reg, _) = ping_registry();
        let resolver = CommandResolver::new(&reg);
        assert!(resolver.resolve("missing").is_err());
    }

    #[test]
    fn test_log_sink_miss_still_normalizes() {
        let (reg, ping) = ping_registry();
        let resolver = CommandResolver::new(&reg).with_log_sink();
        assert!(format!("{:?}", resolver).contains("sink: true"));

        assert_eq!(
            resolver.resolve("missing").err(),
            Some(ResolveError::not_found("missing"))
        );
        assert!(Arc::ptr_eq(&resolver.resolve("ping").unwrap(), &ping));
    }

    #[test]
    fn test_repeated_resolution_is_stable() {
        let (reg, ping) = ping_registry();
        let sink = Arc::new(MemorySink::new());
        let resolver = CommandResolver::new(&reg).with_sink(sink.clone());

        for _ in 0..5 {
            assert!(Arc::ptr_eq(&resolver.resolve("ping").unwrap(), &ping));
            assert_eq!(
                resolver.resolve("pong").err(),
                Some(ResolveError::not_found("pong"))
            );
        }
        // one warning per failed call, none for hits
        assert_eq!(sink.len(), 5);
    }

    #[test]
    fn test_resolution_does_not_mutate_registry() {
        let (mut reg, _) = ping_registry();
        reg.declare("replicate");
        reg.add_alias("p", "ping");
        let names_before = reg.names();
        let aliases_before = reg.aliases();

        {
            let resolver = CommandResolver::new(&reg);
            for name in ["ping", "p", "replicate", "nope", ""] {
                let _ = resolver.resolve(name);
            }
        }

        assert_eq!(reg.names(), names_before);
        assert_eq!(reg.aliases(), aliases_before);
        assert!(matches!(reg.get("replicate"), Some(Slot::Unbound)));
        assert!(reg.get("ping").unwrap().is_bound());
    }

    #[test]
    fn test_alias_resolves_to_target_handler() {
        let (mut reg, ping) = ping_registry();
        reg.add_alias("p", "ping");
        let resolver = CommandResolver::new(&reg);
        assert!(Arc::ptr_eq(&resolver.resolve("p").unwrap(), &ping));
    }

    #[test]
    fn test_unusable_slots_are_not_found() {
        let (mut reg, _) = ping_registry();
        reg.declare("replicate");
        reg.disable("export", "retired");
        let sink = Arc::new(MemorySink::new());
        let resolver = CommandResolver::new(&reg).with_sink(sink.clone());

        assert_eq!(
            resolver.resolve("replicate").err(),
            Some(ResolveError::not_found("replicate"))
        );
        assert_eq!(
            resolver.resolve("export").err(),
            Some(ResolveError::not_found("export"))
        );

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].contains("no handler is bound"));
        assert!(entries[1].contains("retired"));
    }

    #[test]
    fn test_corrupt_alias_chain_is_normalized() {
        let (mut reg, _) = ping_registry();
        reg.add_alias("a", "b");
        reg.add_alias("b", "a");
        let sink = Arc::new(MemorySink::new());
        let resolver = CommandResolver::new(&reg).with_sink(sink.clone());

        assert_eq!(resolver.resolve("a").err(), Some(ResolveError::not_found("a")));
        assert!(matches!(
            resolver.lookup("a").err(),
            Some(LookupFault::AliasCycle { .. })
        ));
        assert_eq!(sink.len(), 1);
        assert!(sink.entries()[0].contains("alias cycle"));
    }

    #[test]
    fn test_unreadable_registry_fault_is_replaced() {
        let reg = UnreadableRegistry;
        let sink = Arc::new(MemorySink::new());
        let resolver = CommandResolver::new(&reg).with_sink(sink.clone());

        let err = resolver.resolve("ping").err().unwrap();
        assert_eq!(err, ResolveError::not_found("ping"));
        assert!(!err.to_string().contains("offline"));

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].contains("ping"));
        assert!(entries[0].contains("backing store offline"));
    }

    #[test]
    fn test_closure_sink() {
        let (reg, _) = ping_registry();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::<String>::new()));
        let seen_in_sink = Arc::clone(&seen);
        let resolver = CommandResolver::new(&reg).with_sink(Arc::new(move |msg: &str| {
            seen_in_sink.lock().push(msg.to_string());
        }));

        let _ = resolver.resolve("missing");
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_contains_and_names() {
        let (mut reg, _) = ping_registry();
        reg.declare("replicate");
        let resolver = CommandResolver::new(&reg);
        assert!(resolver.contains("ping"));
        assert!(!resolver.contains("replicate"));
        assert_eq!(
            resolver.names(),
            vec!["ping".to_string(), "replicate".to_string()]
        );
    }

    #[test]
    fn test_concurrent_resolution() {
        let (reg, ping) = ping_registry();
        let sink = Arc::new(MemorySink::new());
        let resolver = CommandResolver::new(&reg).with_sink(sink.clone());

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let resolver = resolver.clone();
                let ping = Arc::clone(&ping);
                scope.spawn(move || {
                    for _ in 0..100 {
                        assert!(Arc::ptr_eq(&resolver.resolve("ping").unwrap(), &ping));
                        assert!(resolver.resolve("pong").is_err());
                    }
                });
            }
        });

        assert_eq!(sink.len(), 800);
    }

    #[test]
    fn test_shared_registry_sees_owner_updates() {
        let shared: SharedRegistry<Handler> = SharedRegistry::default();
        let resolver = CommandResolver::new(&shared);
        assert!(resolver.resolve("ping").is_err());

        let ping = handler("pong");
        shared.write().register("ping", Arc::clone(&ping));
        assert!(Arc::ptr_eq(&resolver.resolve("ping").unwrap(), &ping));
    }
}
