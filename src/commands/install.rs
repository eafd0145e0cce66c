use crate::core::types::InstallOptions;
use crate::error::Result;
use crate::execution::Context;
use crate::packages::PackageManager;
use crate::ui as output;

pub fn run(
    manager: &dyn PackageManager,
    ctx: &Context,
    options: &InstallOptions,
    packages: &[String],
) -> Result<()> {
    output::info(&format!(
        "Installing {} with {}",
        packages.join(", "),
        manager.name()
    ));
    manager.install(ctx, options, packages)?;
    output::success(&format!("Installed {} package(s)", packages.len()));
    Ok(())
}
