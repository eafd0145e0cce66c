//! Backend selection and construction.
//!
//! [`select_backend`] is the pure decision; [`ManagerFactory`] pairs it with
//! the collaborators every backend is built with.

use crate::config::Settings;
use crate::core::distro::{DistroDetector, Distribution, OsReleaseDetector};
use crate::core::types::{BackendKind, Family};
use crate::error::{DistroPkgError, Result};
use crate::execution::{Context, Elevator, Executor, Runner, SystemElevator, SystemExecutor};
use crate::packages::{
    AptManager, DnfManager, PackageManager, PacmanManager, YumManager, ZypperManager,
};
use crate::ui;
use std::sync::Arc;

/// First RHEL-family major version served by dnf.
pub const DNF_MIN_MAJOR: u32 = 8;

/// Pick the backend for a distribution.
///
/// RHEL-family hosts other than Fedora go to yum only when the major version
/// parses and is below [`DNF_MIN_MAJOR`].
pub fn select_backend(distro: &Distribution) -> Result<BackendKind> {
    let family = distro.family.ok_or_else(|| {
        DistroPkgError::UnsupportedDistribution(if distro.id.is_empty() {
            "unknown".to_string()
        } else {
            distro.id.clone()
        })
    })?;

    Ok(match family {
        Family::Debian => BackendKind::Apt,
        Family::Arch => BackendKind::Pacman,
        Family::Suse => BackendKind::Zypper,
        Family::Rhel if distro.id == "fedora" => BackendKind::Dnf,
        Family::Rhel => match major_version(&distro.version_id) {
            Some(major) if major < DNF_MIN_MAJOR => BackendKind::Yum,
            _ => BackendKind::Dnf,
        },
    })
}

/// Leading numeric component of a version string ("7.9" -> 7).
fn major_version(version_id: &str) -> Option<u32> {
    let digits: String = version_id
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Builds backend managers.
///
/// Every `create*` call returns a new instance; the factory keeps no cache.
#[derive(Clone)]
pub struct ManagerFactory {
    executor: Arc<dyn Executor>,
    elevator: Arc<dyn Elevator>,
    detector: Arc<dyn DistroDetector>,
    family: Option<Family>,
}

impl ManagerFactory {
    pub fn new(
        executor: Arc<dyn Executor>,
        elevator: Arc<dyn Elevator>,
        detector: Arc<dyn DistroDetector>,
    ) -> Self {
        Self {
            executor,
            elevator,
            detector,
            family: None,
        }
    }

    /// Skip detection and always build for `family`.
    pub fn with_family(mut self, family: Option<Family>) -> Self {
        self.family = family;
        self
    }

    /// Real processes, elevation per `settings.elevation`, `/etc/os-release`.
    pub fn system(settings: &Settings) -> Result<Self> {
        let elevator = SystemElevator::from_preference(&settings.elevation)?;
        ui::debug(&format!(
            "Elevation: root={} method={}",
            elevator.is_root(),
            elevator
                .method()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "none".to_string())
        ));

        Ok(Self::new(
            Arc::new(SystemExecutor::new()),
            Arc::new(elevator),
            Arc::new(OsReleaseDetector::new()),
        )
        .with_family(settings.family))
    }

    fn runner(&self) -> Runner {
        Runner::new(Arc::clone(&self.executor), Arc::clone(&self.elevator))
    }

    /// Run the detector, or report the family override as a bare record.
    pub fn detect(&self) -> Result<Distribution> {
        match self.family {
            Some(family) => Ok(Distribution::new(family.as_str(), "", Some(family))),
            None => self.detector.detect(),
        }
    }

    /// Detect the running distribution and build its manager.
    pub fn create(&self, ctx: &Context) -> Result<Box<dyn PackageManager>> {
        ctx.check("detect distribution")?;
        if let Some(family) = self.family {
            return Ok(self.create_for_family(family));
        }
        let distro = self.detector.detect()?;
        self.create_for_distribution(&distro)
    }

    /// RHEL resolves to dnf here, since there is no version to check.
    pub fn create_for_family(&self, family: Family) -> Box<dyn PackageManager> {
        let kind = match family {
            Family::Debian => BackendKind::Apt,
            Family::Rhel => BackendKind::Dnf,
            Family::Arch => BackendKind::Pacman,
            Family::Suse => BackendKind::Zypper,
        };
        self.create_kind(kind)
    }

    pub fn create_for_distribution(
        &self,
        distro: &Distribution,
    ) -> Result<Box<dyn PackageManager>> {
        let kind = select_backend(distro)?;
        ui::debug(&format!(
            "Selected {} for {} {}",
            kind, distro.id, distro.version_id
        ));
        Ok(self.create_kind(kind))
    }

    /// Build a specific backend regardless of the host.
    pub fn create_kind(&self, kind: BackendKind) -> Box<dyn PackageManager> {
        let runner = self.runner();
        match kind {
            BackendKind::Apt => Box::new(AptManager::new(runner)),
            BackendKind::Dnf => Box::new(DnfManager::new(runner)),
            BackendKind::Yum => Box::new(YumManager::new(runner)),
            BackendKind::Pacman => Box::new(PacmanManager::new(runner)),
            BackendKind::Zypper => Box::new(ZypperManager::new(runner)),
        }
    }
}
