use crate::core::types::SearchOptions;
use crate::error::{DistroPkgError, Result};
use crate::execution::Context;
use crate::packages::PackageManager;
use crate::ui as output;
use crate::utils::machine_output;

/// `None` means unlimited; the default keeps terminal output short.
pub fn parse_limit(limit: Option<&str>) -> Result<Option<usize>> {
    match limit {
        None => Ok(Some(50)),
        Some("all") | Some("0") => Ok(None),
        Some(raw) => raw.parse::<usize>().map(Some).map_err(|_| {
            DistroPkgError::Other(format!(
                "Invalid --limit value '{}'. Use a non-negative integer, 0, or 'all'.",
                raw
            ))
        }),
    }
}

pub fn run(
    manager: &dyn PackageManager,
    ctx: &Context,
    query: &str,
    options: &SearchOptions,
    json: bool,
) -> Result<()> {
    let results = manager.search(ctx, query, options)?;

    if json {
        return machine_output::emit_json("search", results, vec![]);
    }
    if results.is_empty() {
        output::info(&format!("No packages match '{}'", query));
        return Ok(());
    }
    super::print_packages(&results, true);
    Ok(())
}

#[cfg(test)]
mod tests;
