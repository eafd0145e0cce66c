use crate::core::types::Family;
use crate::error::{DistroPkgError, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

const OS_RELEASE_PATHS: &[&str] = &["/etc/os-release", "/usr/lib/os-release"];

/// What the factory needs to know about the running distribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    /// `ID` from os-release, lowercased (e.g. "centos", "fedora", "ubuntu")
    pub id: String,
    /// `VERSION_ID`, possibly empty or non-numeric ("stream", rolling releases)
    pub version_id: String,
    /// `ID_LIKE` entries, used when `id` itself is unknown
    pub id_like: Vec<String>,
    pub family: Option<Family>,
}

impl Distribution {
    pub fn new(id: impl Into<String>, version_id: impl Into<String>, family: Option<Family>) -> Self {
        Self {
            id: id.into(),
            version_id: version_id.into(),
            id_like: Vec::new(),
            family,
        }
    }
}

/// Source of [`Distribution`] records.
pub trait DistroDetector: Send + Sync {
    fn detect(&self) -> Result<Distribution>;
}

/// A fixed record detects as itself.
impl DistroDetector for Distribution {
    fn detect(&self) -> Result<Distribution> {
        Ok(self.clone())
    }
}

/// Reads `/etc/os-release` (falling back to `/usr/lib/os-release`).
#[derive(Debug, Clone, Default)]
pub struct OsReleaseDetector {
    path: Option<PathBuf>,
}

impl OsReleaseDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a specific os-release file instead of the standard locations.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl DistroDetector for OsReleaseDetector {
    fn detect(&self) -> Result<Distribution> {
        let candidates: Vec<PathBuf> = match &self.path {
            Some(path) => vec![path.clone()],
            None => OS_RELEASE_PATHS.iter().map(PathBuf::from).collect(),
        };

        for path in &candidates {
            if let Ok(content) = fs::read_to_string(path) {
                let distro = parse_os_release(&content);
                if distro.id.is_empty() {
                    return Err(DistroPkgError::DistroDetection(format!(
                        "{} has no ID field",
                        path.display()
                    )));
                }
                return Ok(distro);
            }
        }

        Err(DistroPkgError::DistroDetection(format!(
            "no readable os-release file (tried {})",
            candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

/// Parse os-release content into a [`Distribution`].
pub fn parse_os_release(content: &str) -> Distribution {
    let mut id = String::new();
    let mut version_id = String::new();
    let mut id_like = String::new();

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        if let Some(val) = line.strip_prefix("ID=") {
            id = unquote(val).to_lowercase();
        } else if let Some(val) = line.strip_prefix("VERSION_ID=") {
            version_id = unquote(val).to_string();
        } else if let Some(val) = line.strip_prefix("ID_LIKE=") {
            id_like = unquote(val).to_lowercase();
        }
    }

    let id_like: Vec<String> = id_like.split_whitespace().map(String::from).collect();
    let family = family_for(&id, &id_like);

    Distribution {
        id,
        version_id,
        id_like,
        family,
    }
}

/// Map an os-release ID (then its ID_LIKE list) onto a family.
pub fn family_for(id: &str, id_like: &[String]) -> Option<Family> {
    family_for_id(id).or_else(|| id_like.iter().find_map(|like| family_for_id(like)))
}

fn family_for_id(id: &str) -> Option<Family> {
    match id {
        "debian" | "ubuntu" | "linuxmint" | "pop" | "elementary" | "raspbian" | "kali"
        | "zorin" | "neon" | "devuan" => Some(Family::Debian),
        "fedora" | "rhel" | "centos" | "rocky" | "almalinux" | "ol" | "amzn" | "scientific" => {
            Some(Family::Rhel)
        }
        "arch" | "archarm" | "manjaro" | "endeavouros" | "garuda" | "artix" | "cachyos"
        | "instantos" => Some(Family::Arch),
        "suse" | "sles" | "sled" | "opensuse" | "opensuse-leap" | "opensuse-tumbleweed"
        | "opensuse-microos" => Some(Family::Suse),
        _ => None,
    }
}

fn unquote(val: &str) -> &str {
    val.trim().trim_matches('"').trim_matches('\'')
}
