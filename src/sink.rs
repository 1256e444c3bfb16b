//! Diagnostic sinks for failed resolutions.
//!
//! The resolver reports each failed lookup as one warning-level message.
//! Where the message goes is up to the host: [`LogSink`] forwards to the
//! `log` facade, [`MemorySink`] keeps the messages for inspection, and any
//! `Fn(&str)` closure works too.

use parking_lot::Mutex;

/// Receives warning-level diagnostic messages.
pub trait WarnSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards warnings to `log::warn!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl WarnSink for LogSink {
    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Records warnings in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded messages, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drain recorded messages.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl WarnSink for MemorySink {
    fn warn(&self, message: &str) {
        self.entries.lock().push(message.to_string());
    }
}

impl<F> WarnSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn warn(&self, message: &str) {
        self(message)
    }
}
