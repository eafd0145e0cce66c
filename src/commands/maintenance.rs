use crate::error::Result;
use crate::execution::Context;
use crate::packages::PackageManager;
use crate::ui as output;

pub fn clean(manager: &dyn PackageManager, ctx: &Context) -> Result<()> {
    manager.clean(ctx)?;
    output::success(&format!("Cleaned {} cache", manager.name()));
    Ok(())
}

pub fn auto_remove(manager: &dyn PackageManager, ctx: &Context) -> Result<()> {
    manager.auto_remove(ctx)?;
    output::success("Removed unneeded packages");
    Ok(())
}
