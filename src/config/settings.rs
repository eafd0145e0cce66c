//! Settings Module
//!
//! Reads `settings.kdl`:
//!
//! ```kdl
//! settings {
//!     timeout 600
//!     elevation "sudo"
//!     verbose #false
//!     family "rhel"
//! }
//! ```

use crate::core::types::Family;
use crate::error::{DistroPkgError, Result};
use crate::utils::paths;
use kdl::{KdlDocument, KdlNode, KdlValue};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

const ELEVATION_VALUES: &[&str] = &["auto", "none", "sudo", "doas", "pkexec"];
const VALID_KEYS: &[&str] = &["timeout", "elevation", "verbose", "family"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Seconds allowed for one invocation; 0 disables the deadline
    pub timeout: u64,
    pub elevation: String,
    pub verbose: bool,
    /// Skip distribution detection and use this family
    pub family: Option<Family>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            elevation: "auto".to_string(),
            verbose: false,
            family: None,
        }
    }
}

impl Settings {
    /// Load from the user config directory, or defaults when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::settings_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            DistroPkgError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let doc: KdlDocument = content.parse()?;
        let mut settings = Self::default();

        for node in doc.nodes() {
            match node.name().value() {
                "settings" => {
                    if let Some(children) = node.children() {
                        for child in children.nodes() {
                            settings.apply(child)?;
                        }
                    }
                }
                other => {
                    return Err(DistroPkgError::ConfigError(format!(
                        "Unknown top-level node '{}', expected 'settings'",
                        other
                    )));
                }
            }
        }

        Ok(settings)
    }

    /// Invocation deadline, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    fn apply(&mut self, node: &KdlNode) -> Result<()> {
        let key = node.name().value();
        let value = node.entries().first().map(|e| e.value()).ok_or_else(|| {
            DistroPkgError::ConfigError(format!("Setting '{}' has no value", key))
        })?;

        match key {
            "timeout" => {
                self.timeout = value
                    .as_integer()
                    .and_then(|n| u64::try_from(n).ok())
                    .ok_or_else(|| invalid(key, value, "a non-negative integer"))?;
            }
            "elevation" => {
                let method = value
                    .as_string()
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| ELEVATION_VALUES.contains(&s.as_str()))
                    .ok_or_else(|| invalid(key, value, &ELEVATION_VALUES.join(", ")))?;
                self.elevation = method;
            }
            "verbose" => {
                self.verbose = value
                    .as_bool()
                    .ok_or_else(|| invalid(key, value, "#true or #false"))?;
            }
            "family" => {
                let family = value
                    .as_string()
                    .and_then(|s| s.parse::<Family>().ok())
                    .ok_or_else(|| invalid(key, value, "debian, rhel, arch, suse"))?;
                self.family = Some(family);
            }
            _ => {
                return Err(DistroPkgError::ConfigError(format!(
                    "Unknown setting: '{}'. Valid settings: {}",
                    key,
                    VALID_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

fn invalid(key: &str, value: &KdlValue, expected: &str) -> DistroPkgError {
    DistroPkgError::ConfigError(format!(
        "Invalid value for '{}': {}. Expected: {}",
        key, value, expected
    ))
}

#[cfg(test)]
mod tests;
