//! Command executor: resolves each command's handler by name and runs it.
//!
//! Commands whose name does not resolve are rejected without running
//! anything; the [`ResolveError`] is handed back so the caller can decide
//! what to do with the originating request.

use std::collections::VecDeque;
use std::fmt;

use serde_json::Value;

use crate::error::{ExecuteError, HandlerError, ResolveError};
use crate::handler::{Command, CommandOutcome, SharedHandler};
use crate::registry::Registry;
use crate::resolver::CommandResolver;

/// Default bound on commands executed by a single [`CommandExecutor::drain`].
pub const DEFAULT_MAX_COMMANDS: usize = 1024;

/// A command that ran to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedCommand {
    pub command: Command,
    pub output: Value,
}

/// Result of draining a command queue.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    pub completed: Vec<CompletedCommand>,
    /// Commands whose handler did not resolve
    pub rejected: Vec<(Command, ResolveError)>,
    /// Commands whose handler returned an error
    pub failed: Vec<(Command, HandlerError)>,
    /// Commands left in the queue when the limit was hit
    pub unprocessed: Vec<Command>,
}

impl ExecutionReport {
    /// Number of commands that reached the resolver.
    pub fn executed(&self) -> usize {
        self.completed.len() + self.rejected.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.failed.is_empty() && self.unprocessed.is_empty()
    }
}

/// Runs commands against handlers found through a [`CommandResolver`].
pub struct CommandExecutor<'a, R: ?Sized> {
    resolver: CommandResolver<'a, R>,
    max_commands: usize,
}

impl<'a, R> CommandExecutor<'a, R>
where
    R: Registry<Handler = SharedHandler> + ?Sized,
{
    pub fn new(resolver: CommandResolver<'a, R>) -> Self {
        Self {
            resolver,
            max_commands: DEFAULT_MAX_COMMANDS,
        }
    }

    /// Bound the number of commands one `drain` call executes.
    pub fn with_max_commands(mut self, max_commands: usize) -> Self {
        self.max_commands = max_commands;
        self
    }

    pub fn resolver(&self) -> &CommandResolver<'a, R> {
        &self.resolver
    }

    /// Resolve and run a single command.
    pub async fn execute(&self, command: &Command) -> Result<CommandOutcome, ExecuteError> {
        let handler = self.resolver.resolve(&command.name)?;

        log::debug!(
            "Executor: dispatching command '{}' ({}) to handler '{}'",
            command.name,
            command.id,
            handler.name(),
        );

        handler
            .execute(command)
            .await
            .map_err(|source| ExecuteError::Failed {
                name: command.name.clone(),
                source,
            })
    }

    /// Run commands in FIFO order until the queue is empty.
    ///
    /// Follow-ups returned by a handler are appended to the queue with their
    /// `parent` set. A rejected or failed command is recorded and the queue
    /// keeps going.
    pub async fn drain(&self, commands: Vec<Command>) -> ExecutionReport {
        let mut queue: VecDeque<Command> = commands.into();
        let mut report = ExecutionReport::default();

        while let Some(command) = queue.pop_front() {
            if report.executed() >= self.max_commands {
                log::warn!(
                    "Executor: command limit {} reached, {} commands left unprocessed",
                    self.max_commands,
                    queue.len() + 1
                );
                report.unprocessed.push(command);
                report.unprocessed.extend(queue.drain(..));
                break;
            }

            match self.execute(&command).await {
                Ok(CommandOutcome { output, followups }) => {
                    for mut followup in followups {
                        followup.parent.get_or_insert(command.id);
                        queue.push_back(followup);
                    }
                    report.completed.push(CompletedCommand { command, output });
                }
                Err(ExecuteError::Rejected(err)) => {
                    log::debug!("Executor: rejected command '{}' ({})", command.name, command.id);
                    report.rejected.push((command, err));
                }
                Err(ExecuteError::Failed { source, .. }) => {
                    log::error!(
                        "Executor: command '{}' ({}) failed: {}",
                        command.name,
                        command.id,
                        source
                    );
                    report.failed.push((command, source));
                }
            }
        }

        report
    }
}

impl<R: ?Sized> fmt::Debug for CommandExecutor<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("resolver", &self.resolver)
            .field("max_commands", &self.max_commands)
            .finish()
    }
}
