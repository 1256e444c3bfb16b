//! # command-resolver
//!
//! Name-to-handler resolution for command executors.
//!
//! A host declares its valid command names up front (directly or through a
//! YAML [`RegistryManifest`]), binds handlers to them in a
//! [`HandlerRegistry`], and resolves runtime-supplied names through a
//! [`CommandResolver`]. Every failed resolution surfaces as a single
//! [`ResolveError::HandlerNotFound`] carrying the requested name; the
//! underlying cause is reported to an optional warning sink.
//!
//! ## Resolution Flow
//!
//! 1. `RegistryManifest::from_yaml_file("commands.yaml")` declares names and aliases
//! 2. `HandlerRegistry::from_manifest(&manifest, bindings)` attaches handlers
//! 3. `CommandResolver::new(&registry).with_log_sink()` borrows the registry
//! 4. `resolver.resolve("ping")` returns the handler or `HandlerNotFound("ping")`
//! 5. `CommandExecutor` runs resolved handlers and rejects unknown commands

pub mod config;
pub mod error;
pub mod executor;
pub mod handler;
pub mod registry;
pub mod resolver;
pub mod sink;

pub use config::ResolverConfig;
pub use error::{ExecuteError, HandlerError, LookupFault, ManifestError, ResolveError};
pub use executor::{CommandExecutor, ExecutionReport};
pub use handler::{Command, CommandHandler, CommandOutcome, SharedHandler};
pub use registry::{HandlerRegistry, Registry, RegistryManifest, SharedRegistry, Slot};
pub use resolver::CommandResolver;
pub use sink::{LogSink, MemorySink, WarnSink};
