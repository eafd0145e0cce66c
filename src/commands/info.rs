use crate::core::types::Package;
use crate::error::{DistroPkgError, Result};
use crate::execution::Context;
use crate::packages::PackageManager;
use crate::ui as output;
use crate::utils::machine_output;
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PackageStatus<'a> {
    package: &'a str,
    installed: bool,
}

#[derive(Debug, Serialize)]
struct VerifyStatus<'a> {
    package: &'a str,
    intact: bool,
}

pub fn run(manager: &dyn PackageManager, ctx: &Context, name: &str, json: bool) -> Result<()> {
    let pkg = manager.info(ctx, name)?;
    if json {
        return machine_output::emit_json("info", pkg, vec![]);
    }
    print_details(&pkg);
    Ok(())
}

fn print_details(pkg: &Package) {
    output::keyval("Name", &pkg.name);
    output::keyval("Version", &pkg.version);
    if !pkg.architecture.is_empty() {
        output::keyval("Architecture", &pkg.architecture);
    }
    if !pkg.repository.is_empty() {
        output::keyval("Repository", &pkg.repository);
    }
    output::keyval("Installed", if pkg.installed { "yes" } else { "no" });
    if pkg.size_bytes > 0 {
        output::keyval("Size", &format_size(pkg.size_bytes));
    }
    if !pkg.description.is_empty() {
        output::keyval("Description", &pkg.description);
    }
    if !pkg.dependencies.is_empty() {
        println!("{}:", "Depends on".bold());
        for dep in &pkg.dependencies {
            output::indent(dep, 1);
        }
    }
}

pub(crate) fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Fails when the package is not installed, so the exit status carries the answer.
pub fn installed(manager: &dyn PackageManager, ctx: &Context, name: &str, json: bool) -> Result<()> {
    let installed = manager.is_installed(ctx, name)?;
    if json {
        machine_output::emit_json(
            "installed",
            PackageStatus {
                package: name,
                installed,
            },
            vec![],
        )?;
    } else if installed {
        output::success(&format!("{} is installed", name));
    }

    if installed {
        Ok(())
    } else {
        Err(DistroPkgError::Other(format!("{} is not installed", name)))
    }
}

pub fn verify(manager: &dyn PackageManager, ctx: &Context, name: &str, json: bool) -> Result<()> {
    let intact = manager.verify(ctx, name)?;
    if json {
        machine_output::emit_json(
            "verify",
            VerifyStatus {
                package: name,
                intact,
            },
            vec![],
        )?;
    } else if intact {
        output::success(&format!("{} passed verification", name));
    }

    if intact {
        Ok(())
    } else {
        Err(DistroPkgError::Other(format!("{} failed verification", name)))
    }
}
