use super::Elevator;
use crate::error::{DistroPkgError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use sudo::RunningAs;

/// Tools that can run a command as root, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationMethod {
    Sudo,
    Doas,
    Pkexec,
}

impl ElevationMethod {
    pub const ALL: [ElevationMethod; 3] = [Self::Sudo, Self::Doas, Self::Pkexec];

    pub fn binary(&self) -> &'static str {
        match self {
            Self::Sudo => "sudo",
            Self::Doas => "doas",
            Self::Pkexec => "pkexec",
        }
    }

    pub fn is_available(&self) -> bool {
        which::which(self.binary()).is_ok()
    }
}

impl fmt::Display for ElevationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

impl FromStr for ElevationMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sudo" => Ok(Self::Sudo),
            "doas" => Ok(Self::Doas),
            "pkexec" => Ok(Self::Pkexec),
            other => Err(format!("unknown elevation method '{}'", other)),
        }
    }
}

/// Elevation decision computed once per process and handed to every backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemElevator {
    is_root: bool,
    method: Option<ElevationMethod>,
}

impl SystemElevator {
    pub fn new(is_root: bool, method: Option<ElevationMethod>) -> Self {
        Self { is_root, method }
    }

    /// Check the current user and pick the first elevation tool on `PATH`.
    pub fn detect() -> Self {
        let is_root = matches!(sudo::check(), RunningAs::Root);
        let method = if is_root {
            None
        } else {
            ElevationMethod::ALL
                .into_iter()
                .find(ElevationMethod::is_available)
        };
        Self { is_root, method }
    }

    /// Build from a settings value: `auto`, `none`, or a method name.
    pub fn from_preference(preference: &str) -> Result<Self> {
        let is_root = matches!(sudo::check(), RunningAs::Root);
        match preference.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(Self::detect()),
            "none" => Ok(Self::new(is_root, None)),
            other => {
                let method = other
                    .parse::<ElevationMethod>()
                    .map_err(DistroPkgError::ConfigError)?;
                Ok(Self::new(is_root, Some(method)))
            }
        }
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn method(&self) -> Option<ElevationMethod> {
        self.method
    }
}

impl Elevator for SystemElevator {
    fn elevate(&self, cmd: &str, args: &[String]) -> (String, Vec<String>) {
        match self.method {
            Some(method) if !self.is_root => {
                let mut elevated = Vec::with_capacity(args.len() + 1);
                elevated.push(cmd.to_string());
                elevated.extend(args.iter().cloned());
                (method.binary().to_string(), elevated)
            }
            _ => (cmd.to_string(), args.to_vec()),
        }
    }

    fn can_elevate(&self) -> bool {
        self.is_root || self.method.is_some()
    }
}
