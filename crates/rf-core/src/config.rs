use rf_sandbox::ResourceLimits;
use rf_script::{Grant, Namespace};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub limits: ResourceLimits,
    pub namespace: NamespaceConfig,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct NamespaceConfig {
    /// Capability bundles placed into the execution namespace. Empty by
    /// default: only the language's built-in operators are reachable.
    pub grants: Vec<Grant>,
}

impl NamespaceConfig {
    pub fn build(&self) -> Namespace {
        Namespace::with_grants(&self.grants)
    }
}

impl Config {
    /// Load the config file, falling back to the compiled-in defaults when
    /// it is missing or unparsable.
    pub fn load_or_default() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &PathBuf) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                warn!("failed to parse {}: {e}", path.display());
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }
}

pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("ringfence").join("config.toml")
}
