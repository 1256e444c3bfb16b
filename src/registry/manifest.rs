//! YAML command manifest.
//!
//! The manifest is the startup declaration of every valid command name:
//!
//! ```yaml
//! commands:
//!   - name: ping
//!     aliases: [p]
//!   - name: export
//!     enabled: false
//!     reason: replaced by exportV2
//! aliases:
//!   legacyPing: ping
//! ```
//!
//! Handlers are attached separately via [`HandlerRegistry::from_manifest`],
//! so the manifest stays plain data.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::HandlerRegistry;
use crate::error::ManifestError;

/// Top-level manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryManifest {
    /// Declared commands
    #[serde(default)]
    pub commands: Vec<CommandDecl>,

    /// Free-standing aliases: alias -> target
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, String>,
}

/// One declared command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDecl {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Why the command is disabled (only meaningful with `enabled: false`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl CommandDecl {
    /// An enabled declaration with no aliases.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            enabled: true,
            reason: None,
            description: None,
        }
    }
}

impl RegistryManifest {
    /// Parse a manifest from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_yaml::from_str(yaml)?;
        Ok(manifest)
    }

    /// Parse a manifest from a YAML file path.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, ManifestError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Structural checks: names are non-empty and unique, and no alias
    /// collides with a command name or another alias.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut commands = HashSet::new();
        for decl in &self.commands {
            if decl.name.trim().is_empty() {
                return Err(ManifestError::Validation(
                    "command name must not be empty".to_string(),
                ));
            }
            if !commands.insert(decl.name.as_str()) {
                return Err(ManifestError::Validation(format!(
                    "command '{}' declared more than once",
                    decl.name
                )));
            }
        }

        let mut aliases = HashSet::new();
        let declared = self
            .commands
            .iter()
            .flat_map(|d| d.aliases.iter().map(move |a| (a.as_str(), d.name.as_str())));
        let free = self.aliases.iter().map(|(a, t)| (a.as_str(), t.as_str()));
        for (alias, target) in declared.chain(free) {
            if alias.trim().is_empty() {
                return Err(ManifestError::Validation(format!(
                    "empty alias for command '{}'",
                    target
                )));
            }
            if commands.contains(alias) {
                return Err(ManifestError::Validation(format!(
                    "alias '{}' shadows a declared command",
                    alias
                )));
            }
            if !aliases.insert(alias) {
                return Err(ManifestError::Validation(format!(
                    "alias '{}' declared more than once",
                    alias
                )));
            }
        }

        Ok(())
    }
}

impl<H> HandlerRegistry<H> {
    /// Build a registry from a manifest and a set of handler bindings.
    ///
    /// - declared + bound → usable
    /// - declared, no binding → unbound
    /// - `enabled: false` → disabled (any binding is dropped)
    ///
    /// Bindings with no declaration are skipped with a warning, and so is
    /// every alias whose chain would fail at lookup time.
    pub fn from_manifest(
        manifest: &RegistryManifest,
        mut bindings: HashMap<String, H>,
    ) -> Result<Self, ManifestError> {
        manifest.validate()?;

        let mut registry = Self::new();
        for decl in &manifest.commands {
            let handler = bindings.remove(&decl.name);
            if !decl.enabled {
                let reason = decl
                    .reason
                    .clone()
                    .unwrap_or_else(|| "disabled in manifest".to_string());
                registry.disable(decl.name.clone(), reason);
            } else if let Some(handler) = handler {
                registry.register(decl.name.clone(), handler);
            } else {
                log::debug!(
                    "Registry: command '{}' declared without a handler",
                    decl.name
                );
                registry.declare(decl.name.clone());
            }

            for alias in &decl.aliases {
                registry.add_alias(alias.clone(), decl.name.clone());
            }
        }

        for (alias, target) in &manifest.aliases {
            registry.add_alias(alias.clone(), target.clone());
        }

        for (alias, fault) in registry.validate() {
            log::warn!("Registry: alias '{}' will never resolve: {}", alias, fault);
        }

        let mut leftovers: Vec<_> = bindings.into_keys().collect();
        leftovers.sort();
        for name in leftovers {
            log::warn!(
                "Registry: handler '{}' has no manifest declaration, skipping",
                name
            );
        }

        Ok(registry)
    }
}
