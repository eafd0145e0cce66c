use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// One discoverable or installed unit, as reported by a backend.
// `version` stays in the backend's native format (epoch/release included).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub installed: bool,
    pub repository: String,
    pub description: String,
    pub size_bytes: u64,
    pub architecture: String,
    pub dependencies: Vec<String>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.version)
        }
    }
}

// One configured package source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub url: String,
    pub enabled: bool,
    pub gpg_key: Option<String>,
    #[serde(rename = "type")]
    pub repo_type: String,
    pub components: Vec<String>,
    pub distribution: String,
    pub priority: i32,
}

impl Default for Repository {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            enabled: true,
            gpg_key: None,
            repo_type: String::new(),
            components: Vec::new(),
            distribution: String::new(),
            priority: 0,
        }
    }
}

impl Repository {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Distribution grouping that decides which backend applies.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Debian,
    Rhel,
    Arch,
    Suse,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debian => "debian",
            Self::Rhel => "rhel",
            Self::Arch => "arch",
            Self::Suse => "suse",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debian" => Ok(Self::Debian),
            "rhel" | "redhat" | "fedora" => Ok(Self::Rhel),
            "arch" | "archlinux" => Ok(Self::Arch),
            "suse" | "opensuse" => Ok(Self::Suse),
            other => Err(format!("unknown distribution family '{}'", other)),
        }
    }
}

/// The five concrete backends.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Apt,
    Dnf,
    Yum,
    Pacman,
    Zypper,
}

impl BackendKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Pacman => "pacman",
            Self::Zypper => "zypper",
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Self::Apt => Family::Debian,
            Self::Dnf | Self::Yum => Family::Rhel,
            Self::Pacman => Family::Arch,
            Self::Zypper => Family::Suse,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Option sets. A backend that cannot express a flag ignores it.

#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub force: bool,
    pub reinstall: bool,
    pub skip_verify: bool,
    pub download_only: bool,
    pub allow_downgrade: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RemoveOptions {
    pub force: bool,
    pub purge: bool,
    /// Also remove dependencies nothing else needs
    pub auto_remove: bool,
    pub quiet: bool,
}

/// Options for `update` and `upgrade`.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    pub quiet: bool,
    pub skip_verify: bool,
    pub download_only: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Keep only results whose name equals the query
    pub exact: bool,
    /// Query installed status for every result
    pub include_installed: bool,
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests;
