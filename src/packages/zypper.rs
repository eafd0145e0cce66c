//! openSUSE and SLES: `zypper`, with `rpm` for local queries and key import.
//!
//! Every call runs with `--non-interactive`. Exit codes 100-103 are
//! informational and count as success.

pub mod errors;
pub mod parsers;

use crate::core::types::{
    BackendKind, InstallOptions, Package, RemoveOptions, Repository, SearchOptions, UpdateOptions,
};
use crate::error::{DistroPkgError, ErrorKind, Operation, PackageError, Result};
use crate::execution::{CommandResult, Context, Runner};
use crate::packages::traits::PackageManager;
use crate::packages::{argv, finish_search, rpm};
use crate::utils::sanitize::{
    validate_key_source, validate_package_name, validate_package_names, validate_query,
    validate_repository_fields, validate_repository_name,
};

/// Global options placed before the zypper command.
#[derive(Debug, Clone, Copy, Default)]
struct Globals {
    quiet: bool,
    no_gpg_checks: bool,
}

impl Globals {
    fn args(self, command: &[&str]) -> Vec<String> {
        let mut args = vec!["--non-interactive".to_string()];
        if self.quiet {
            args.push("--quiet".into());
        }
        if self.no_gpg_checks {
            args.push("--no-gpg-checks".into());
        }
        args.extend(command.iter().map(|s| s.to_string()));
        args
    }
}

pub struct ZypperManager {
    runner: Runner,
}

impl ZypperManager {
    pub fn new(runner: Runner) -> Self {
        Self { runner }
    }

    fn zypper(
        &self,
        ctx: &Context,
        operation: Operation,
        args: Vec<String>,
        targets: &[String],
    ) -> Result<CommandResult> {
        let result = self.runner.run_elevated(ctx, "zypper", &args)?;
        if errors::is_success(result.exit_code) {
            Ok(result)
        } else {
            Err(errors::classify(operation, &result, targets).into())
        }
    }

    fn query(&self, ctx: &Context, command: &[&str]) -> Result<CommandResult> {
        self.runner
            .run(ctx, "zypper", &Globals::default().args(command))
    }

    fn configured_repositories(&self, ctx: &Context) -> Result<Vec<Repository>> {
        let result = self.query(ctx, &["repos", "--details"])?;
        // 6 is ZYPPER_EXIT_NO_REPOS
        if result.exit_code == 6 {
            return Ok(Vec::new());
        }
        if !errors::is_success(result.exit_code) {
            return Err(errors::classify(Operation::ListRepositories, &result, &[]).into());
        }
        Ok(parsers::parse_repos(&result.stdout_text()))
    }

    fn modify_repository(&self, ctx: &Context, name: &str, enable: bool) -> Result<()> {
        validate_repository_name(name)?;
        let (operation, flag) = if enable {
            (Operation::EnableRepository, "-e")
        } else {
            (Operation::DisableRepository, "-d")
        };
        let args = Globals::default().args(&["modifyrepo", flag, name]);
        self.zypper(ctx, operation, args, &[name.to_string()])?;
        Ok(())
    }
}

impl PackageManager for ZypperManager {
    fn kind(&self) -> BackendKind {
        BackendKind::Zypper
    }

    fn is_available(&self) -> bool {
        which::which("zypper").is_ok()
    }

    fn install(&self, ctx: &Context, options: &InstallOptions, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        validate_package_names(packages)?;

        let globals = Globals {
            quiet: options.quiet,
            no_gpg_checks: options.skip_verify,
        };
        let mut args = globals.args(&["install", "--auto-agree-with-licenses"]);
        // zypper reinstalls through `install --force`
        if options.force || options.reinstall {
            args.push("--force".into());
        }
        if options.download_only {
            args.push("--download-only".into());
        }
        if options.allow_downgrade {
            args.push("--oldpackage".into());
        }
        args.extend(packages.iter().cloned());

        self.zypper(ctx, Operation::Install, args, packages)?;
        Ok(())
    }

    fn remove(&self, ctx: &Context, options: &RemoveOptions, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        validate_package_names(packages)?;

        let globals = Globals {
            quiet: options.quiet,
            ..Default::default()
        };
        let mut args = globals.args(&["remove"]);
        if options.auto_remove {
            args.push("--clean-deps".into());
        }
        if options.force {
            args.push("--force-resolution".into());
        }
        args.extend(packages.iter().cloned());

        self.zypper(ctx, Operation::Remove, args, packages)?;
        Ok(())
    }

    fn update(&self, ctx: &Context, options: &UpdateOptions) -> Result<()> {
        let globals = Globals {
            quiet: options.quiet,
            no_gpg_checks: options.skip_verify,
        };
        self.zypper(ctx, Operation::Update, globals.args(&["refresh"]), &[])?;
        Ok(())
    }

    fn upgrade(&self, ctx: &Context, options: &UpdateOptions, packages: &[String]) -> Result<()> {
        validate_package_names(packages)?;

        let globals = Globals {
            quiet: options.quiet,
            no_gpg_checks: options.skip_verify,
        };
        let mut args = globals.args(&["update", "--auto-agree-with-licenses"]);
        if options.download_only {
            args.push("--download-only".into());
        }
        args.extend(packages.iter().cloned());

        self.zypper(ctx, Operation::Upgrade, args, packages)?;
        Ok(())
    }

    fn is_installed(&self, ctx: &Context, name: &str) -> Result<bool> {
        validate_package_name(name)?;
        rpm::is_installed(&self.runner, ctx, name)
    }

    fn search(&self, ctx: &Context, query: &str, options: &SearchOptions) -> Result<Vec<Package>> {
        validate_query(query)?;
        let mut command = vec!["search"];
        if options.exact {
            command.push("--match-exact");
        }
        command.push(query);

        let result = self.query(ctx, &command)?;
        if result.exit_code == errors::CAP_NOT_FOUND_EXIT_CODE {
            return Ok(Vec::new());
        }
        if !errors::is_success(result.exit_code) {
            return Err(errors::classify(Operation::Search, &result, &[]).into());
        }

        let found = parsers::parse_search(&result.stdout_text());
        Ok(finish_search(self, ctx, query, options, found))
    }

    fn info(&self, ctx: &Context, name: &str) -> Result<Package> {
        validate_package_name(name)?;
        let targets = [name.to_string()];
        let not_found = || -> DistroPkgError {
            PackageError::new(ErrorKind::PackageNotFound, Operation::Info)
                .with_target(name)
                .into()
        };

        let result = self.query(ctx, &["info", name])?;
        let text = result.stdout_text();
        if result.exit_code == errors::CAP_NOT_FOUND_EXIT_CODE || parsers::is_info_not_found(&text) {
            return Err(not_found());
        }
        if !errors::is_success(result.exit_code) {
            return Err(errors::classify(Operation::Info, &result, &targets).into());
        }

        parsers::parse_info(&text)
            .into_iter()
            .next()
            .ok_or_else(not_found)
    }

    fn list_installed(&self, ctx: &Context) -> Result<Vec<Package>> {
        rpm::list_installed(&self.runner, ctx)
    }

    fn list_upgradable(&self, ctx: &Context) -> Result<Vec<Package>> {
        let result = self.query(ctx, &["list-updates"])?;
        if !errors::is_success(result.exit_code) {
            return Err(errors::classify(Operation::ListUpgradable, &result, &[]).into());
        }
        Ok(parsers::parse_updates(&result.stdout_text()))
    }

    fn add_repository(&self, ctx: &Context, repo: &Repository) -> Result<()> {
        validate_repository_name(&repo.name)?;
        validate_repository_fields(repo)?;
        if let Some(key) = &repo.gpg_key {
            validate_key_source(key)?;
        }
        if self
            .configured_repositories(ctx)?
            .iter()
            .any(|r| r.name == repo.name)
        {
            return Err(
                PackageError::new(ErrorKind::RepositoryExists, Operation::AddRepository)
                    .with_target(&repo.name)
                    .into(),
            );
        }

        let priority = repo.priority.to_string();
        let mut command = vec!["addrepo"];
        if repo.priority > 0 {
            command.extend(["--priority", priority.as_str()]);
        }
        if repo.gpg_key.is_none() {
            command.push("--no-gpgcheck");
        }
        if !repo.enabled {
            command.push("--disable");
        }
        command.extend([repo.url.as_str(), repo.name.as_str()]);

        let targets = [repo.name.clone()];
        let args = Globals::default().args(&command);
        self.zypper(ctx, Operation::AddRepository, args, &targets)?;

        if let Some(key) = &repo.gpg_key {
            let result = self
                .runner
                .run_elevated(ctx, "rpm", &argv(&["--import", key.as_str()]))?;
            if !result.success() {
                return Err(errors::classify(Operation::AddRepository, &result, &targets).into());
            }
        }
        Ok(())
    }

    fn remove_repository(&self, ctx: &Context, name: &str) -> Result<()> {
        validate_repository_name(name)?;
        let args = Globals::default().args(&["removerepo", name]);
        self.zypper(ctx, Operation::RemoveRepository, args, &[name.to_string()])?;
        Ok(())
    }

    fn list_repositories(&self, ctx: &Context) -> Result<Vec<Repository>> {
        self.configured_repositories(ctx)
    }

    fn enable_repository(&self, ctx: &Context, name: &str) -> Result<()> {
        self.modify_repository(ctx, name, true)
    }

    fn disable_repository(&self, ctx: &Context, name: &str) -> Result<()> {
        self.modify_repository(ctx, name, false)
    }

    fn refresh_repositories(&self, ctx: &Context) -> Result<()> {
        let args = Globals::default().args(&["refresh"]);
        self.zypper(ctx, Operation::RefreshRepositories, args, &[])?;
        Ok(())
    }

    fn clean(&self, ctx: &Context) -> Result<()> {
        let args = Globals::default().args(&["clean", "--all"]);
        self.zypper(ctx, Operation::Clean, args, &[])?;
        Ok(())
    }

    fn auto_remove(&self, ctx: &Context) -> Result<()> {
        let listing = self.query(ctx, &["packages", "--unneeded"])?;
        if !errors::is_success(listing.exit_code) {
            return Err(errors::classify(Operation::AutoRemove, &listing, &[]).into());
        }
        let unneeded = parsers::parse_unneeded(&listing.stdout_text());
        if unneeded.is_empty() {
            return Ok(());
        }

        let mut args = Globals::default().args(&["remove", "--clean-deps"]);
        args.extend(unneeded.iter().cloned());
        self.zypper(ctx, Operation::AutoRemove, args, &unneeded)?;
        Ok(())
    }

    fn verify(&self, ctx: &Context, name: &str) -> Result<bool> {
        validate_package_name(name)?;
        rpm::verify(&self.runner, ctx, name)
    }
}
