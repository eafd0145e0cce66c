//! RHEL/CentOS 7 and older: `yum`, `yum-config-manager` and `rpm`.

pub mod errors;
pub mod parsers;

use crate::core::types::{
    BackendKind, InstallOptions, Package, RemoveOptions, Repository, SearchOptions, UpdateOptions,
};
use crate::error::{ErrorKind, Operation, PackageError, Result};
use crate::execution::{CommandResult, Context, Runner};
use crate::packages::traits::PackageManager;
use crate::packages::{argv, finish_search, rpm, yum_repos};
use crate::utils::sanitize::{
    validate_key_source, validate_package_name, validate_package_names, validate_query,
    validate_repository_fields, validate_repository_name,
};

/// `check-update` exit code meaning "updates are available".
const UPDATES_AVAILABLE: i32 = 100;

pub struct YumManager {
    runner: Runner,
}

impl YumManager {
    pub fn new(runner: Runner) -> Self {
        Self { runner }
    }

    fn yum(
        &self,
        ctx: &Context,
        operation: Operation,
        args: Vec<String>,
        targets: &[String],
    ) -> Result<CommandResult> {
        let result = self.runner.run_elevated(ctx, "yum", &args)?;
        if result.success() {
            Ok(result)
        } else {
            Err(errors::classify(operation, &result, targets).into())
        }
    }

    /// `yum-config-manager` silently ignores unknown ids, so check first.
    fn set_enabled(&self, ctx: &Context, name: &str, enable: bool) -> Result<()> {
        validate_repository_name(name)?;
        let (operation, flag) = if enable {
            (Operation::EnableRepository, "--enable")
        } else {
            (Operation::DisableRepository, "--disable")
        };
        yum_repos::require(&self.runner, ctx, operation, name, errors::classify)?;

        let result = self
            .runner
            .run_elevated(ctx, "yum-config-manager", &argv(&[flag, name]))?;
        if !result.success() {
            return Err(errors::classify(operation, &result, &[name.to_string()]).into());
        }
        Ok(())
    }
}

impl PackageManager for YumManager {
    fn kind(&self) -> BackendKind {
        BackendKind::Yum
    }

    fn is_available(&self) -> bool {
        which::which("yum").is_ok()
    }

    fn install(&self, ctx: &Context, options: &InstallOptions, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        validate_package_names(packages)?;

        let verb = if options.reinstall { "reinstall" } else { "install" };
        let mut args = argv(&[verb, "-y"]);
        if options.quiet {
            args.push("-q".into());
        }
        if options.skip_verify {
            args.push("--nogpgcheck".into());
        }
        if options.download_only {
            args.push("--downloadonly".into());
        }
        args.extend(packages.iter().cloned());

        self.yum(ctx, Operation::Install, args, packages)?;
        Ok(())
    }

    fn remove(&self, ctx: &Context, options: &RemoveOptions, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        validate_package_names(packages)?;

        let mut args = argv(&["remove", "-y"]);
        if options.quiet {
            args.push("-q".into());
        }
        if options.auto_remove {
            args.push("--setopt=clean_requirements_on_remove=1".into());
        }
        args.extend(packages.iter().cloned());

        self.yum(ctx, Operation::Remove, args, packages)?;
        Ok(())
    }

    fn update(&self, ctx: &Context, options: &UpdateOptions) -> Result<()> {
        let mut args = argv(&["check-update"]);
        if options.quiet {
            args.push("-q".into());
        }
        let result = self.runner.run_elevated(ctx, "yum", &args)?;
        match result.exit_code {
            0 | UPDATES_AVAILABLE => Ok(()),
            _ => Err(errors::classify(Operation::Update, &result, &[]).into()),
        }
    }

    fn upgrade(&self, ctx: &Context, options: &UpdateOptions, packages: &[String]) -> Result<()> {
        validate_package_names(packages)?;

        // yum's upgrade verb is `update`
        let mut args = argv(&["update", "-y"]);
        if options.quiet {
            args.push("-q".into());
        }
        if options.skip_verify {
            args.push("--nogpgcheck".into());
        }
        if options.download_only {
            args.push("--downloadonly".into());
        }
        args.extend(packages.iter().cloned());

        self.yum(ctx, Operation::Upgrade, args, packages)?;
        Ok(())
    }

    fn is_installed(&self, ctx: &Context, name: &str) -> Result<bool> {
        validate_package_name(name)?;
        rpm::is_installed(&self.runner, ctx, name)
    }

    fn search(&self, ctx: &Context, query: &str, options: &SearchOptions) -> Result<Vec<Package>> {
        validate_query(query)?;
        let result = self.runner.run(ctx, "yum", &argv(&["search", query]))?;
        if parsers::is_no_match(&result.combined_text()) {
            return Ok(Vec::new());
        }
        if !result.success() {
            return Err(errors::classify(Operation::Search, &result, &[]).into());
        }

        let found = parsers::parse_search(&result.stdout_text());
        Ok(finish_search(self, ctx, query, options, found))
    }

    fn info(&self, ctx: &Context, name: &str) -> Result<Package> {
        validate_package_name(name)?;
        let targets = [name.to_string()];
        let result = self.runner.run(ctx, "yum", &argv(&["info", "-q", name]))?;
        if !result.success() {
            return Err(errors::classify(Operation::Info, &result, &targets).into());
        }

        parsers::parse_info(&result.stdout_text())
            .into_iter()
            .next()
            .ok_or_else(|| {
                PackageError::new(ErrorKind::PackageNotFound, Operation::Info)
                    .with_target(name)
                    .into()
            })
    }

    fn list_installed(&self, ctx: &Context) -> Result<Vec<Package>> {
        rpm::list_installed(&self.runner, ctx)
    }

    fn list_upgradable(&self, ctx: &Context) -> Result<Vec<Package>> {
        let result = self.runner.run(ctx, "yum", &argv(&["check-update", "-q"]))?;
        match result.exit_code {
            0 => Ok(Vec::new()),
            UPDATES_AVAILABLE => Ok(parsers::parse_check_update(&result.stdout_text())),
            _ => Err(errors::classify(Operation::ListUpgradable, &result, &[]).into()),
        }
    }

    fn add_repository(&self, ctx: &Context, repo: &Repository) -> Result<()> {
        validate_repository_name(&repo.name)?;
        validate_repository_fields(repo)?;
        if let Some(key) = &repo.gpg_key {
            validate_key_source(key)?;
        }
        yum_repos::write(&self.runner, ctx, repo, errors::classify)
    }

    fn remove_repository(&self, ctx: &Context, name: &str) -> Result<()> {
        validate_repository_name(name)?;
        yum_repos::delete(&self.runner, ctx, name, errors::classify)
    }

    fn list_repositories(&self, ctx: &Context) -> Result<Vec<Repository>> {
        yum_repos::list(&self.runner, ctx, errors::classify)
    }

    fn enable_repository(&self, ctx: &Context, name: &str) -> Result<()> {
        self.set_enabled(ctx, name, true)
    }

    fn disable_repository(&self, ctx: &Context, name: &str) -> Result<()> {
        self.set_enabled(ctx, name, false)
    }

    fn refresh_repositories(&self, ctx: &Context) -> Result<()> {
        self.yum(ctx, Operation::RefreshRepositories, argv(&["makecache"]), &[])?;
        Ok(())
    }

    fn clean(&self, ctx: &Context) -> Result<()> {
        self.yum(ctx, Operation::Clean, argv(&["clean", "all"]), &[])?;
        Ok(())
    }

    fn auto_remove(&self, ctx: &Context) -> Result<()> {
        self.yum(ctx, Operation::AutoRemove, argv(&["autoremove", "-y"]), &[])?;
        Ok(())
    }

    fn verify(&self, ctx: &Context, name: &str) -> Result<bool> {
        validate_package_name(name)?;
        rpm::verify(&self.runner, ctx, name)
    }
}
