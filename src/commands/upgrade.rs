use crate::core::types::UpdateOptions;
use crate::error::Result;
use crate::execution::Context;
use crate::packages::PackageManager;
use crate::ui as output;

/// Refresh package metadata.
pub fn update(manager: &dyn PackageManager, ctx: &Context, options: &UpdateOptions) -> Result<()> {
    output::info(&format!("Refreshing {} metadata", manager.name()));
    manager.update(ctx, options)?;
    output::success("Package metadata is up to date");
    Ok(())
}

/// Upgrade the named packages, or everything when `packages` is empty.
pub fn upgrade(
    manager: &dyn PackageManager,
    ctx: &Context,
    options: &UpdateOptions,
    packages: &[String],
) -> Result<()> {
    if packages.is_empty() {
        output::info("Upgrading all packages");
    } else {
        output::info(&format!("Upgrading {}", packages.join(", ")));
    }
    manager.upgrade(ctx, options, packages)?;
    output::success("Upgrade complete");
    Ok(())
}
