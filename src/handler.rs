//! Command handler contract.
//!
//! A handler is opaque to the resolver; this module only fixes the shape the
//! [`CommandExecutor`](crate::executor::CommandExecutor) drives: take a
//! [`Command`], produce a [`CommandOutcome`] (optionally with follow-up
//! commands) or a [`HandlerError`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::HandlerError;

/// A named unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub id: Uuid,
    /// Name looked up in the registry.
    pub name: String,
    #[serde(default)]
    pub data: Value,
    /// Command whose outcome scheduled this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Uuid>,
}

impl Command {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            data,
            parent: None,
        }
    }

    /// A command with `Value::Null` data.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Value::Null)
    }

    /// Schedule `child` as a follow-up of this command.
    pub fn child(&self, name: impl Into<String>, data: Value) -> Self {
        let mut child = Self::new(name, data);
        child.parent = Some(self.id);
        child
    }
}

/// What a handler returns on success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    #[serde(default)]
    pub output: Value,
    /// Commands to run after this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub followups: Vec<Command>,
}

impl CommandOutcome {
    pub fn completed(output: Value) -> Self {
        Self {
            output,
            followups: Vec::new(),
        }
    }

    /// No output, no follow-ups.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn then(mut self, command: Command) -> Self {
        self.followups.push(command);
        self
    }
}

/// Executes commands of one name.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    async fn execute(&self, command: &Command) -> Result<CommandOutcome, HandlerError>;
}

/// The handler type stored in registries driven by the executor.
pub type SharedHandler = Arc<dyn CommandHandler>;

// ---------------------------------------------------------------------------
// Built-in handlers
// ---------------------------------------------------------------------------

/// Replies `"pong"`.
#[derive(Debug, Default)]
pub struct PingHandler;

#[async_trait]
impl CommandHandler for PingHandler {
    fn name(&self) -> &str {
        "ping"
    }

    async fn execute(&self, _command: &Command) -> Result<CommandOutcome, HandlerError> {
        Ok(CommandOutcome::completed(Value::String("pong".to_string())))
    }
}

/// Returns the command's data unchanged. Null data is rejected.
#[derive(Debug, Default)]
pub struct EchoHandler;

#[async_trait]
impl CommandHandler for EchoHandler {
    fn name(&self) -> &str {
        "echo"
    }

    async fn execute(&self, command: &Command) -> Result<CommandOutcome, HandlerError> {
        if command.data.is_null() {
            return Err(HandlerError::InvalidData("echo needs a payload".to_string()));
        }
        Ok(CommandOutcome::completed(command.data.clone()))
    }
}

/// Built-in handlers keyed by name, ready for
/// [`HandlerRegistry::from_manifest`](crate::registry::HandlerRegistry::from_manifest).
pub fn builtin_handlers() -> Vec<(String, SharedHandler)> {
    let handlers: Vec<SharedHandler> = vec![Arc::new(PingHandler), Arc::new(EchoHandler)];
    handlers
        .into_iter()
        .map(|h| (h.name().to_string(), h))
        .collect()
}
