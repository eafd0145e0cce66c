use crate::core::types::RemoveOptions;
use crate::error::{DistroPkgError, Result};
use crate::execution::Context;
use crate::packages::{PackageManager, RemovalOutcome, remove_each};
use crate::ui as output;
use crate::utils::machine_output;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RemovalReport {
    package: String,
    removed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&RemovalOutcome> for RemovalReport {
    fn from(outcome: &RemovalOutcome) -> Self {
        Self {
            package: outcome.package.clone(),
            removed: outcome.is_ok(),
            error: outcome.result.as_ref().err().map(|e| e.to_string()),
        }
    }
}

/// Remove each package separately; one failure does not stop the rest.
pub fn run(
    manager: &dyn PackageManager,
    ctx: &Context,
    options: &RemoveOptions,
    packages: &[String],
    json: bool,
) -> Result<()> {
    let mut outcomes = remove_each(manager, ctx, options, packages);
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();

    if json {
        let reports: Vec<RemovalReport> = outcomes.iter().map(RemovalReport::from).collect();
        let errors = reports.iter().filter_map(|r| r.error.clone()).collect();
        machine_output::emit_json("remove", reports, errors)?;
    } else {
        for outcome in &outcomes {
            match &outcome.result {
                Ok(()) => output::success(&format!("Removed {}", outcome.package)),
                Err(e) => output::error(&format!("{}: {}", outcome.package, e)),
            }
        }
    }

    match failed {
        0 => Ok(()),
        1 if outcomes.len() == 1 => match outcomes.pop().map(|o| o.result) {
            Some(Err(e)) => Err(e),
            _ => Ok(()),
        },
        n => Err(DistroPkgError::Other(format!(
            "{} of {} packages could not be removed",
            n,
            outcomes.len()
        ))),
    }
}

#[cfg(test)]
mod tests;
