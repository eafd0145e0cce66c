use crate::error::Result;
use crate::execution::Context;
use crate::packages::PackageManager;
use crate::ui as output;
use crate::utils::machine_output;

pub fn run(manager: &dyn PackageManager, ctx: &Context, upgradable: bool, json: bool) -> Result<()> {
    let (command, mut packages) = if upgradable {
        ("list-upgradable", manager.list_upgradable(ctx)?)
    } else {
        ("list-installed", manager.list_installed(ctx)?)
    };
    packages.sort_by(|a, b| a.name.cmp(&b.name));

    if json {
        return machine_output::emit_json(command, packages, vec![]);
    }
    if packages.is_empty() {
        if upgradable {
            output::success("Everything is up to date");
        } else {
            output::info("No installed packages reported");
        }
        return Ok(());
    }
    super::print_packages(&packages, false);
    output::info(&format!("{} package(s)", packages.len()));
    Ok(())
}
