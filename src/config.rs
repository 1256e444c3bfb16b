//! Resolver configuration.
//!
//! # Environment Variables
//!
//! - `COMMAND_MANIFEST`: path to the YAML command manifest (optional)
//! - `RESOLVER_WARN`: `0`, `false`, `off` or `no` disables the warning sink (default: on)
//! - `RESOLVER_MAX_COMMANDS`: executor drain bound (default: 1024)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::executor::DEFAULT_MAX_COMMANDS;

/// Runtime configuration for resolver hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Manifest declaring the valid command names.
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,

    /// Emit a warning for each failed resolution.
    #[serde(default = "default_warn_on_miss")]
    pub warn_on_miss: bool,

    #[serde(default = "default_max_commands")]
    pub max_commands: usize,
}

fn default_warn_on_miss() -> bool {
    true
}

fn default_max_commands() -> usize {
    DEFAULT_MAX_COMMANDS
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            manifest_path: None,
            warn_on_miss: default_warn_on_miss(),
            max_commands: default_max_commands(),
        }
    }
}

impl ResolverConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Unparseable values fall back to
    /// defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("COMMAND_MANIFEST").filter(|p| !p.trim().is_empty()) {
            config.manifest_path = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup("RESOLVER_WARN") {
            config.warn_on_miss = !matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            );
        }

        if let Some(value) = lookup("RESOLVER_MAX_COMMANDS") {
            match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.max_commands = n,
                _ => log::warn!(
                    "Ignoring RESOLVER_MAX_COMMANDS={:?}, using {}",
                    value,
                    config.max_commands
                ),
            }
        }

        config
    }
}
