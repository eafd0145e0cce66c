use crate::cli::args::{Command, RepoCommand};
use crate::commands;
use crate::commands::search::parse_limit;
use crate::core::types::{
    InstallOptions, RemoveOptions, Repository, SearchOptions, UpdateOptions,
};
use crate::error::Result;
use crate::execution::Context;
use crate::packages::PackageManager;

pub(super) fn route(
    manager: &dyn PackageManager,
    ctx: &Context,
    command: &Command,
    quiet: bool,
    json: bool,
) -> Result<()> {
    match command {
        Command::Install {
            packages,
            reinstall,
            force,
            skip_verify,
            download_only,
            allow_downgrade,
        } => {
            let options = InstallOptions {
                force: *force,
                reinstall: *reinstall,
                skip_verify: *skip_verify,
                download_only: *download_only,
                allow_downgrade: *allow_downgrade,
                quiet,
            };
            commands::install::run(manager, ctx, &options, packages)
        }

        Command::Remove {
            packages,
            purge,
            autoremove,
            force,
        } => {
            let options = RemoveOptions {
                force: *force,
                purge: *purge,
                auto_remove: *autoremove,
                quiet,
            };
            commands::remove::run(manager, ctx, &options, packages, json)
        }

        Command::Update { skip_verify } => {
            let options = UpdateOptions {
                quiet,
                skip_verify: *skip_verify,
                ..Default::default()
            };
            commands::upgrade::update(manager, ctx, &options)
        }

        Command::Upgrade {
            packages,
            skip_verify,
            download_only,
        } => {
            let options = UpdateOptions {
                quiet,
                skip_verify: *skip_verify,
                download_only: *download_only,
            };
            commands::upgrade::upgrade(manager, ctx, &options, packages)
        }

        Command::Search {
            query,
            exact,
            installed,
            limit,
        } => {
            let options = SearchOptions {
                exact: *exact,
                include_installed: *installed,
                limit: parse_limit(limit.as_deref())?,
            };
            commands::search::run(manager, ctx, query, &options, json)
        }

        Command::Info { package } => commands::info::run(manager, ctx, package, json),
        Command::Installed { package } => commands::info::installed(manager, ctx, package, json),
        Command::Verify { package } => commands::info::verify(manager, ctx, package, json),
        Command::List { upgradable } => commands::list::run(manager, ctx, *upgradable, json),
        Command::Clean => commands::maintenance::clean(manager, ctx),
        Command::Autoremove => commands::maintenance::auto_remove(manager, ctx),

        Command::Repo { command } => route_repo(manager, ctx, command, json),

        // Handled before a manager is built
        Command::Detect | Command::Settings => Ok(()),
    }
}

fn route_repo(
    manager: &dyn PackageManager,
    ctx: &Context,
    command: &RepoCommand,
    json: bool,
) -> Result<()> {
    match command {
        RepoCommand::List => commands::repo::list(manager, ctx, json),
        RepoCommand::Add {
            name,
            url,
            key,
            distribution,
            components,
            priority,
            disabled,
        } => {
            let repo = Repository {
                name: name.clone(),
                url: url.clone(),
                enabled: !disabled,
                gpg_key: key.clone(),
                components: components.clone(),
                distribution: distribution.clone().unwrap_or_default(),
                priority: *priority,
                ..Default::default()
            };
            commands::repo::add(manager, ctx, &repo)
        }
        RepoCommand::Remove { name } => commands::repo::remove(manager, ctx, name),
        RepoCommand::Enable { name } => commands::repo::set_enabled(manager, ctx, name, true),
        RepoCommand::Disable { name } => commands::repo::set_enabled(manager, ctx, name, false),
        RepoCommand::Refresh => commands::repo::refresh(manager, ctx),
    }
}
