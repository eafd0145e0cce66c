//! One module per CLI command.
//!
//! Handlers take an already-built [`PackageManager`] and a [`Context`], so
//! they run the same against real processes and a recording executor.
//!
//! [`PackageManager`]: crate::packages::PackageManager
//! [`Context`]: crate::execution::Context

pub mod detect;
pub mod info;
pub mod install;
pub mod list;
pub mod maintenance;
pub mod remove;
pub mod repo;
pub mod search;
pub mod settings;
pub mod upgrade;

use crate::core::types::Package;
use colored::Colorize;

/// One line per package: name, version, and an installed marker.
pub(crate) fn print_packages(packages: &[Package], with_description: bool) {
    for pkg in packages {
        let mut line = format!("{} {}", pkg.name.bold(), pkg.version.green());
        if !pkg.repository.is_empty() {
            line = format!("{}/{}", pkg.repository.blue(), line);
        }
        if pkg.installed {
            line.push_str(&format!(" {}", "[installed]".cyan()));
        }
        println!("{}", line);
        if with_description && !pkg.description.is_empty() {
            println!("    {}", pkg.description);
        }
    }
}
