use crate::core::types::Repository;
use crate::error::Result;
use crate::execution::Context;
use crate::packages::PackageManager;
use crate::ui as output;
use crate::utils::machine_output;
use colored::Colorize;

pub fn list(manager: &dyn PackageManager, ctx: &Context, json: bool) -> Result<()> {
    let repos = manager.list_repositories(ctx)?;
    if json {
        return machine_output::emit_json("repo-list", repos, vec![]);
    }
    if repos.is_empty() {
        output::info("No repositories configured");
        return Ok(());
    }
    for repo in &repos {
        let state = if repo.enabled {
            "enabled".green()
        } else {
            "disabled".yellow()
        };
        println!("{} [{}] {}", repo.name.bold(), state, repo.url);
    }
    Ok(())
}

pub fn add(manager: &dyn PackageManager, ctx: &Context, repo: &Repository) -> Result<()> {
    manager.add_repository(ctx, repo)?;
    output::success(&format!("Added repository {}", repo.name));
    Ok(())
}

pub fn remove(manager: &dyn PackageManager, ctx: &Context, name: &str) -> Result<()> {
    manager.remove_repository(ctx, name)?;
    output::success(&format!("Removed repository {}", name));
    Ok(())
}

pub fn set_enabled(
    manager: &dyn PackageManager,
    ctx: &Context,
    name: &str,
    enabled: bool,
) -> Result<()> {
    if enabled {
        manager.enable_repository(ctx, name)?;
        output::success(&format!("Enabled repository {}", name));
    } else {
        manager.disable_repository(ctx, name)?;
        output::success(&format!("Disabled repository {}", name));
    }
    Ok(())
}

pub fn refresh(manager: &dyn PackageManager, ctx: &Context) -> Result<()> {
    manager.refresh_repositories(ctx)?;
    output::success("Repository metadata refreshed");
    Ok(())
}
