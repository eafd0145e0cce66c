//! `rpm` queries shared by the dnf, yum and zypper backends.

use crate::core::types::Package;
use crate::error::{ErrorKind, Operation, PackageError, Result};
use crate::execution::{Context, Runner};
use crate::packages::argv;

/// `--qf` format for [`list_installed`].
pub const QUERY_FORMAT: &str = "%{NAME} %{EPOCHNUM}:%{VERSION}-%{RELEASE} %{ARCH} %{SIZE}\\n";

/// `rpm -q`: exit 0 installed, 1 not installed, anything else is an error.
pub fn is_installed(runner: &Runner, ctx: &Context, name: &str) -> Result<bool> {
    let result = runner.run(ctx, "rpm", &argv(&["-q", name]))?;
    match result.exit_code {
        0 => Ok(true),
        1 => Ok(false),
        _ => Err(PackageError::new(ErrorKind::OperationFailed, Operation::IsInstalled)
            .with_target(name)
            .with_cause(result.combined_text())
            .into()),
    }
}

pub fn list_installed(runner: &Runner, ctx: &Context) -> Result<Vec<Package>> {
    let result = runner.run(ctx, "rpm", &argv(&["-qa", "--qf", QUERY_FORMAT]))?;
    if !result.success() {
        return Err(PackageError::new(ErrorKind::OperationFailed, Operation::ListInstalled)
            .with_cause(result.combined_text())
            .into());
    }
    Ok(parse_installed(&result.stdout_text()))
}

/// `rpm -V`: true when nothing changed, false when files differ.
pub fn verify(runner: &Runner, ctx: &Context, name: &str) -> Result<bool> {
    let result = runner.run(ctx, "rpm", &argv(&["-V", name]))?;
    if result.success() {
        return Ok(true);
    }
    let text = result.combined_text();
    if text.contains("is not installed") {
        return Err(PackageError::new(ErrorKind::PackageNotInstalled, Operation::Verify)
            .with_target(name)
            .with_cause(text)
            .into());
    }
    Ok(false)
}

/// Parse `rpm -qa --qf QUERY_FORMAT` output.
///
/// Lines need name, version and arch; size is optional. A zero epoch is
/// dropped from the version.
pub fn parse_installed(text: &str) -> Vec<Package> {
    text.lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 3 {
                return None;
            }
            let version = fields[1].strip_prefix("0:").unwrap_or(fields[1]);
            Some(Package {
                name: fields[0].to_string(),
                version: version.to_string(),
                architecture: fields[2].to_string(),
                size_bytes: fields.get(3).and_then(|s| s.parse().ok()).unwrap_or(0),
                installed: true,
                ..Default::default()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests;
