//! Fedora and RHEL 8+ backend: `dnf`, with `rpm` for local queries.

pub mod errors;
pub mod parsers;

use crate::core::types::{
    BackendKind, InstallOptions, Package, RemoveOptions, Repository, SearchOptions, UpdateOptions,
};
use crate::error::{ErrorKind, Operation, PackageError, Result};
use crate::execution::{CommandResult, Context, Runner};
use crate::packages::traits::PackageManager;
use crate::packages::{argv, finish_search, rpm, yum_repos};
use crate::ui;
use crate::utils::sanitize::{
    validate_key_source, validate_package_name, validate_package_names, validate_query,
    validate_repository_fields, validate_repository_name,
};

/// `check-update` exit code meaning "updates are available".
const UPDATES_AVAILABLE: i32 = 100;

pub struct DnfManager {
    runner: Runner,
}

impl DnfManager {
    pub fn new(runner: Runner) -> Self {
        Self { runner }
    }

    fn dnf(
        &self,
        ctx: &Context,
        operation: Operation,
        args: Vec<String>,
        targets: &[String],
    ) -> Result<CommandResult> {
        let result = self.runner.run_elevated(ctx, "dnf", &args)?;
        if result.success() {
            Ok(result)
        } else {
            Err(errors::classify(operation, &result, targets).into())
        }
    }

    /// `rpm -E %{?fedora}` expands to the release number on Fedora only.
    fn is_fedora(&self, ctx: &Context) -> bool {
        self.runner
            .run(ctx, "rpm", &argv(&["-E", "%{?fedora}"]))
            .map(|r| r.success() && !r.stdout_text().trim().is_empty())
            .unwrap_or(false)
    }

    /// RPM Fusion on RHEL needs EPEL. Failure here is logged and ignored.
    fn try_install_epel(&self, ctx: &Context) {
        let outcome = self.dnf(ctx, Operation::Install, argv(&["install", "-y", "epel-release"]), &[]);
        if let Err(e) = outcome {
            ui::debug(&format!("epel-release pre-install skipped: {}", e));
        }
    }

    fn install_release_package(&self, ctx: &Context, repo: &Repository) -> Result<()> {
        if repo.url.contains("rpmfusion") && !self.is_fedora(ctx) {
            self.try_install_epel(ctx);
        }
        self.dnf(
            ctx,
            Operation::AddRepository,
            argv(&["install", "-y", repo.url.as_str()]),
            &[repo.name.clone()],
        )?;
        Ok(())
    }

    fn set_enabled(&self, ctx: &Context, name: &str, enable: bool) -> Result<()> {
        validate_repository_name(name)?;
        let (operation, flag) = if enable {
            (Operation::EnableRepository, "--set-enabled")
        } else {
            (Operation::DisableRepository, "--set-disabled")
        };
        self.dnf(
            ctx,
            operation,
            argv(&["config-manager", flag, name]),
            &[name.to_string()],
        )?;
        Ok(())
    }
}

impl PackageManager for DnfManager {
    fn kind(&self) -> BackendKind {
        BackendKind::Dnf
    }

    fn is_available(&self) -> bool {
        which::which("dnf").is_ok()
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
        if options.force {
            args.push("--allowerasing".into());
        }
        args.extend(packages.iter().cloned());

        self.dnf(ctx, Operation::Install, args, packages)?;
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
            args.push("--setopt=clean_requirements_on_remove=True".into());
        }
        args.extend(packages.iter().cloned());

        self.dnf(ctx, Operation::Remove, args, packages)?;
        Ok(())
    }

    fn update(&self, ctx: &Context, options: &UpdateOptions) -> Result<()> {
        let mut args = argv(&["check-update"]);
        if options.quiet {
            args.push("-q".into());
        }
        let result = self.runner.run_elevated(ctx, "dnf", &args)?;
        match result.exit_code {
            0 | UPDATES_AVAILABLE => Ok(()),
            _ => Err(errors::classify(Operation::Update, &result, &[]).into()),
        }
    }

    fn upgrade(&self, ctx: &Context, options: &UpdateOptions, packages: &[String]) -> Result<()> {
        validate_package_names(packages)?;

        let mut args = argv(&["upgrade", "-y"]);
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

        self.dnf(ctx, Operation::Upgrade, args, packages)?;
        Ok(())
    }

    fn is_installed(&self, ctx: &Context, name: &str) -> Result<bool> {
        validate_package_name(name)?;
        rpm::is_installed(&self.runner, ctx, name)
    }

    fn search(&self, ctx: &Context, query: &str, options: &SearchOptions) -> Result<Vec<Package>> {
        validate_query(query)?;
        let result = self.runner.run(ctx, "dnf", &argv(&["search", "-q", query]))?;
        let text = result.combined_text();
        if parsers::is_no_match(&text) {
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
        let result = self.runner.run(ctx, "dnf", &argv(&["info", "-q", name]))?;
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
        let result = self.runner.run(ctx, "dnf", &argv(&["check-update", "-q"]))?;
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
        if repo.url.ends_with(".rpm") {
            return self.install_release_package(ctx, repo);
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
        self.dnf(ctx, Operation::RefreshRepositories, argv(&["makecache"]), &[])?;
        Ok(())
    }

    fn clean(&self, ctx: &Context) -> Result<()> {
        self.dnf(ctx, Operation::Clean, argv(&["clean", "all"]), &[])?;
        Ok(())
    }

    fn auto_remove(&self, ctx: &Context) -> Result<()> {
        self.dnf(ctx, Operation::AutoRemove, argv(&["autoremove", "-y"]), &[])?;
        Ok(())
    }

    fn verify(&self, ctx: &Context, name: &str) -> Result<bool> {
        validate_package_name(name)?;
        rpm::verify(&self.runner, ctx, name)
    }
}
