//! # Package Manager Backends
//!
//! One manager per distribution family, all behind the [`PackageManager`]
//! contract:
//!
//! - **apt** (`apt`): Debian, Ubuntu and derivatives
//! - **dnf** (`dnf`): Fedora and RHEL-compatible 8+
//! - **yum** (`yum`): RHEL-compatible 7 and older
//! - **pacman** (`pacman`): Arch and derivatives
//! - **zypper** (`zypper`): openSUSE and SLES
//!
//! ## Layout
//!
//! Every backend is a `<name>.rs` file plus a `<name>/` directory:
//! - `<name>.rs`: command construction and exit-code handling
//! - `<name>/parsers.rs`: pure text to [`Package`]/[`Repository`] transforms
//! - `<name>/errors.rs`: the backend's ordered [`classify::Classifier`] table
//!
//! Backends share the data model, the error taxonomy and the helpers in
//! [`parsers`], [`rpm`], [`yum_repos`] and this module, but no partial
//! implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use distropkg::config::Settings;
//! use distropkg::core::types::InstallOptions;
//! use distropkg::execution::Context;
//! use distropkg::packages::ManagerFactory;
//!
//! let factory = ManagerFactory::system(&Settings::default())?;
//! let ctx = Context::new();
//! let manager = factory.create(&ctx)?;
//! manager.install(&ctx, &InstallOptions::default(), &["htop".to_string()])?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`Repository`]: crate::core::types::Repository

pub mod apt;
pub mod classify;
pub mod dnf;
pub mod factory;
pub mod pacman;
pub mod parsers;
pub mod rpm;
pub mod traits;
pub mod yum;
pub mod yum_repos;
pub mod zypper;

pub use apt::AptManager;
pub use dnf::DnfManager;
pub use factory::{ManagerFactory, select_backend};
pub use pacman::PacmanManager;
pub use traits::PackageManager;
pub use yum::YumManager;
pub use zypper::ZypperManager;

use crate::core::types::{Package, RemoveOptions, SearchOptions};
use crate::error::Result;
use crate::execution::Context;
use crate::ui;
use rayon::prelude::*;

/// Outcome of removing one package in a batch.
#[derive(Debug)]
pub struct RemovalOutcome {
    pub package: String,
    pub result: Result<()>,
}

impl RemovalOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Remove packages one at a time, continuing past failures.
///
/// Every package gets its own outcome, in input order.
pub fn remove_each<M: PackageManager + ?Sized>(
    manager: &M,
    ctx: &Context,
    options: &RemoveOptions,
    packages: &[String],
) -> Vec<RemovalOutcome> {
    packages
        .iter()
        .map(|package| {
            let result = manager.remove(ctx, options, std::slice::from_ref(package));
            if let Err(e) = &result {
                ui::debug(&format!("Removing {} failed: {}", package, e));
            }
            RemovalOutcome {
                package: package.clone(),
                result,
            }
        })
        .collect()
}

/// Mark packages the backend reports as installed.
///
/// Best-effort: a failed query leaves `installed` untouched and is only
/// logged. Records already marked installed are not queried again.
pub fn annotate_installed<M: PackageManager + ?Sized>(
    manager: &M,
    ctx: &Context,
    packages: &mut [Package],
) {
    packages
        .par_iter_mut()
        .filter(|pkg| !pkg.installed)
        .for_each(|pkg| match manager.is_installed(ctx, &pkg.name) {
            Ok(installed) => pkg.installed = installed,
            Err(e) => ui::debug(&format!(
                "Could not check installed state of {}: {}",
                pkg.name, e
            )),
        });
}

/// Apply exact-match, limit and installed annotation to raw search results.
pub fn finish_search<M: PackageManager + ?Sized>(
    manager: &M,
    ctx: &Context,
    query: &str,
    options: &SearchOptions,
    mut results: Vec<Package>,
) -> Vec<Package> {
    if options.exact {
        results.retain(|pkg| pkg.name == query);
    }
    if let Some(limit) = options.limit {
        results.truncate(limit);
    }
    if options.include_installed {
        annotate_installed(manager, ctx, &mut results);
    }
    results
}

/// Build an argument vector from string literals.
pub(crate) fn argv(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests;
