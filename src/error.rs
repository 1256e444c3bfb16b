//! Error types for command resolution and execution.
//!
//! Callers of [`CommandResolver::resolve`](crate::resolver::CommandResolver::resolve)
//! only ever see [`ResolveError`]. The finer-grained [`LookupFault`] is what
//! the resolver logs before normalizing it away.

use thiserror::Error;

/// The single error kind reported by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No usable handler exists for the requested name.
    #[error("No handler defined for command '{name}'")]
    HandlerNotFound { name: String },
}

impl ResolveError {
    /// Build a `HandlerNotFound` for `name`.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::HandlerNotFound { name: name.into() }
    }

    /// The name that failed to resolve.
    pub fn name(&self) -> &str {
        match self {
            Self::HandlerNotFound { name } => name,
        }
    }
}

/// Why a lookup did not produce a usable handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupFault {
    /// The name has no slot in the registry.
    #[error("command is not registered")]
    NotRegistered,

    /// The name is declared but no handler has been attached.
    #[error("command is declared but no handler is bound")]
    Unbound,

    /// The name is declared and switched off.
    #[error("command is disabled: {reason}")]
    Disabled { reason: String },

    /// Following aliases loops back on itself.
    #[error("alias cycle: {}", .chain.join(" -> "))]
    AliasCycle { chain: Vec<String> },

    /// The alias chain is longer than the lookup is willing to follow.
    #[error("alias chain too deep: {}", .chain.join(" -> "))]
    TooDeep { chain: Vec<String> },

    /// An alias points at a name that has no slot.
    #[error("alias '{alias}' points at unknown command '{target}'")]
    DanglingAlias { alias: String, target: String },

    /// The registry backend could not be read.
    #[error("registry unreadable: {0}")]
    Unreadable(String),
}

impl LookupFault {
    /// Whether the fault indicates a malformed registry rather than a plain miss.
    pub fn is_registry_corrupt(&self) -> bool {
        matches!(
            self,
            Self::AliasCycle { .. }
                | Self::TooDeep { .. }
                | Self::DanglingAlias { .. }
                | Self::Unreadable(_)
        )
    }
}

/// Errors raised while loading or validating a command manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// YAML parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest parsed but is not well formed.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors returned by a command handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The command payload was not what the handler expects.
    #[error("Invalid command data: {0}")]
    InvalidData(String),

    /// The handler ran and failed.
    #[error("Execution failed: {0}")]
    Failed(String),
}

/// Errors surfaced by the [`CommandExecutor`](crate::executor::CommandExecutor).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
    /// The command name did not resolve; the command was rejected unexecuted.
    #[error("Command rejected: {0}")]
    Rejected(#[from] ResolveError),

    /// The handler was found but returned an error.
    #[error("Command '{name}' failed: {source}")]
    Failed {
        name: String,
        #[source]
        source: HandlerError,
    },
}
