//! Debian family backend: `apt-get`, `apt-cache`, `dpkg-query` and `dpkg`.

pub mod errors;
pub mod parsers;

use crate::core::types::{
    BackendKind, InstallOptions, Package, RemoveOptions, Repository, SearchOptions, UpdateOptions,
};
use crate::error::{ErrorKind, Operation, PackageError, Result};
use crate::execution::{CommandResult, Context, Runner};
use crate::packages::parsers::repo_file::LocatedRepository;
use crate::packages::traits::PackageManager;
use crate::packages::{annotate_installed, argv, finish_search};
use crate::utils::sanitize::{
    validate_key_source, validate_package_name, validate_package_names, validate_query,
    validate_repository_fields, validate_repository_name,
};

const SOURCES_LIST: &str = "/etc/apt/sources.list";
const SOURCES_DIR: &str = "/etc/apt/sources.list.d";

pub struct AptManager {
    runner: Runner,
}

impl AptManager {
    pub fn new(runner: Runner) -> Self {
        Self { runner }
    }

    fn apt_get(
        &self,
        ctx: &Context,
        operation: Operation,
        args: Vec<String>,
        targets: &[String],
    ) -> Result<CommandResult> {
        let result = self.runner.run_elevated(ctx, "apt-get", &args)?;
        if result.success() {
            Ok(result)
        } else {
            Err(errors::classify(operation, &result, targets).into())
        }
    }

    fn located_repositories(&self, ctx: &Context) -> Result<Vec<LocatedRepository>> {
        let args = argv(&[
            "-rsH",
            "--include=*.list",
            "--include=*.sources",
            "^",
            SOURCES_LIST,
            SOURCES_DIR,
        ]);
        let result = self.runner.run(ctx, "grep", &args)?;
        // grep: 1 means no lines, 2 means an unreadable path (still partial output)
        if result.exit_code > 2 {
            return Err(errors::classify(Operation::ListRepositories, &result, &[]).into());
        }
        Ok(parsers::parse_sources(&result.stdout_text()))
    }

    fn find_repository(
        &self,
        ctx: &Context,
        operation: Operation,
        name: &str,
    ) -> Result<LocatedRepository> {
        validate_repository_name(name)?;
        self.located_repositories(ctx)?
            .into_iter()
            .find(|r| r.repository.name == name)
            .ok_or_else(|| {
                PackageError::new(ErrorKind::RepositoryNotFound, operation)
                    .with_target(name)
                    .into()
            })
    }

    fn toggle_repository(&self, ctx: &Context, name: &str, enable: bool) -> Result<()> {
        let operation = if enable {
            Operation::EnableRepository
        } else {
            Operation::DisableRepository
        };
        validate_repository_name(name)?;
        let entries = self.located_repositories(ctx)?;
        let located = entries
            .iter()
            .find(|r| r.repository.name == name)
            .ok_or_else(|| {
                PackageError::new(ErrorKind::RepositoryNotFound, operation).with_target(name)
            })?;
        // A repository is its file, which may mix enabled and disabled entries.
        let pending = entries
            .iter()
            .any(|r| r.file == located.file && r.repository.enabled != enable);
        if !pending {
            return Ok(());
        }

        let mut args = argv(&["-i", "-E"]);
        if located.file.ends_with(".sources") {
            args.extend(argv(&["-e", "/^Enabled:/d"]));
            if !enable {
                args.extend(argv(&["-e", r"s/^(Types:.*)$/Enabled: no\n\1/"]));
            }
        } else {
            let expr = if enable {
                r"s/^#[[:space:]]*(deb(-src)?[[:space:]])/\1/"
            } else {
                r"s/^(deb(-src)?[[:space:]])/# \1/"
            };
            args.extend(argv(&["-e", expr]));
        }
        args.push(located.file.clone());

        let result = self.runner.run_elevated(ctx, "sed", &args)?;
        if !result.success() {
            return Err(errors::classify(operation, &result, &[name.to_string()]).into());
        }
        Ok(())
    }
}

impl PackageManager for AptManager {
    fn kind(&self) -> BackendKind {
        BackendKind::Apt
    }

    fn is_available(&self) -> bool {
        which::which("apt-get").is_ok()
    }

    fn install(&self, ctx: &Context, options: &InstallOptions, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        validate_package_names(packages)?;

        let mut args = argv(&["install", "-y"]);
        if options.quiet {
            args.push("-q".into());
        }
        if options.reinstall {
            args.push("--reinstall".into());
        }
        if options.allow_downgrade {
            args.push("--allow-downgrades".into());
        }
        if options.download_only {
            args.push("--download-only".into());
        }
        if options.skip_verify {
            args.push("--allow-unauthenticated".into());
        }
        if options.force {
            args.extend(argv(&["-o", "Dpkg::Options::=--force-confnew"]));
        }
        args.extend(packages.iter().cloned());

        self.apt_get(ctx, Operation::Install, args, packages)?;
        Ok(())
    }

    fn remove(&self, ctx: &Context, options: &RemoveOptions, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        validate_package_names(packages)?;

        let verb = if options.purge { "purge" } else { "remove" };
        let mut args = argv(&[verb, "-y"]);
        if options.quiet {
            args.push("-q".into());
        }
        if options.auto_remove {
            args.push("--auto-remove".into());
        }
        if options.force {
            args.push("--allow-remove-essential".into());
        }
        args.extend(packages.iter().cloned());

        self.apt_get(ctx, Operation::Remove, args, packages)?;
        Ok(())
    }

    fn update(&self, ctx: &Context, options: &UpdateOptions) -> Result<()> {
        let mut args = argv(&["update"]);
        if options.quiet {
            args.push("-q".into());
        }
        self.apt_get(ctx, Operation::Update, args, &[])?;
        Ok(())
    }

    fn upgrade(&self, ctx: &Context, options: &UpdateOptions, packages: &[String]) -> Result<()> {
        validate_package_names(packages)?;

        let mut args = if packages.is_empty() {
            argv(&["upgrade", "-y"])
        } else {
            argv(&["install", "--only-upgrade", "-y"])
        };
        if options.quiet {
            args.push("-q".into());
        }
        if options.download_only {
            args.push("--download-only".into());
        }
        if options.skip_verify {
            args.push("--allow-unauthenticated".into());
        }
        args.extend(packages.iter().cloned());

        self.apt_get(ctx, Operation::Upgrade, args, packages)?;
        Ok(())
    }

    fn is_installed(&self, ctx: &Context, name: &str) -> Result<bool> {
        validate_package_name(name)?;
        let result = self
            .runner
            .run(ctx, "dpkg-query", &argv(&["-W", "-f=${Status}", name]))?;
        match result.exit_code {
            0 => Ok(parsers::is_installed_status(&result.stdout_text())),
            1 => Ok(false),
            _ => Err(errors::classify(Operation::IsInstalled, &result, &[name.to_string()]).into()),
        }
    }

    fn search(&self, ctx: &Context, query: &str, options: &SearchOptions) -> Result<Vec<Package>> {
        validate_query(query)?;
        let mut args = argv(&["search"]);
        if options.exact {
            args.push("--names-only".into());
        }
        args.push(query.to_string());

        let result = self.runner.run(ctx, "apt-cache", &args)?;
        if !result.success() {
            let error = errors::classify(Operation::Search, &result, &[]);
            if error.is(ErrorKind::PackageNotFound) {
                return Ok(Vec::new());
            }
            return Err(error.into());
        }

        let found = parsers::parse_search(&result.stdout_text());
        Ok(finish_search(self, ctx, query, options, found))
    }

    fn info(&self, ctx: &Context, name: &str) -> Result<Package> {
        validate_package_name(name)?;
        let targets = [name.to_string()];
        let result = self.runner.run(ctx, "apt-cache", &argv(&["show", name]))?;
        if !result.success() {
            return Err(errors::classify(Operation::Info, &result, &targets).into());
        }

        let mut packages = parsers::parse_show(&result.stdout_text());
        if packages.is_empty() {
            return Err(PackageError::new(ErrorKind::PackageNotFound, Operation::Info)
                .with_target(name)
                .with_cause(result.combined_text())
                .into());
        }
        packages.truncate(1);
        annotate_installed(self, ctx, &mut packages);
        Ok(packages.remove(0))
    }

    fn list_installed(&self, ctx: &Context) -> Result<Vec<Package>> {
        let format = format!("-f={}", parsers::INSTALLED_FORMAT);
        let args = argv(&["-W", format.as_str()]);
        let result = self.runner.run(ctx, "dpkg-query", &args)?;
        if !result.success() {
            return Err(errors::classify(Operation::ListInstalled, &result, &[]).into());
        }
        Ok(parsers::parse_installed(&result.stdout_text()))
    }

    fn list_upgradable(&self, ctx: &Context) -> Result<Vec<Package>> {
        let result = self.runner.run(ctx, "apt", &argv(&["list", "--upgradable"]))?;
        if !result.success() {
            return Err(errors::classify(Operation::ListUpgradable, &result, &[]).into());
        }
        Ok(parsers::parse_upgradable(&result.stdout_text()))
    }

    fn add_repository(&self, ctx: &Context, repo: &Repository) -> Result<()> {
        validate_repository_name(&repo.name)?;
        validate_repository_fields(repo)?;
        if let Some(key) = &repo.gpg_key {
            validate_key_source(key)?;
        }
        let existing = self.located_repositories(ctx)?;
        if existing.iter().any(|r| r.repository.name == repo.name) {
            return Err(
                PackageError::new(ErrorKind::RepositoryExists, Operation::AddRepository)
                    .with_target(&repo.name)
                    .into(),
            );
        }

        let path = format!("{}/{}.list", SOURCES_DIR, repo.name);
        let line = parsers::render_source_line(repo);
        let result =
            self.runner
                .run_elevated_with_input(ctx, line.as_bytes(), "tee", &argv(&[path.as_str()]))?;
        if !result.success() {
            return Err(
                errors::classify(Operation::AddRepository, &result, &[repo.name.clone()]).into(),
            );
        }
        Ok(())
    }

    fn remove_repository(&self, ctx: &Context, name: &str) -> Result<()> {
        let located = self.find_repository(ctx, Operation::RemoveRepository, name)?;
        if located.file == SOURCES_LIST {
            return Err(
                PackageError::new(ErrorKind::Unsupported, Operation::RemoveRepository)
                    .with_target(name)
                    .with_cause(format!("entries in {} are not removed", SOURCES_LIST))
                    .into(),
            );
        }

        let result = self
            .runner
            .run_elevated(ctx, "rm", &argv(&["-f", located.file.as_str()]))?;
        if !result.success() {
            return Err(
                errors::classify(Operation::RemoveRepository, &result, &[name.to_string()]).into(),
            );
        }
        Ok(())
    }

    fn list_repositories(&self, ctx: &Context) -> Result<Vec<Repository>> {
        Ok(self
            .located_repositories(ctx)?
            .into_iter()
            .map(|r| r.repository)
            .collect())
    }

    fn enable_repository(&self, ctx: &Context, name: &str) -> Result<()> {
        self.toggle_repository(ctx, name, true)
    }

    fn disable_repository(&self, ctx: &Context, name: &str) -> Result<()> {
        self.toggle_repository(ctx, name, false)
    }

    fn refresh_repositories(&self, ctx: &Context) -> Result<()> {
        self.apt_get(ctx, Operation::RefreshRepositories, argv(&["update"]), &[])?;
        Ok(())
    }

    fn clean(&self, ctx: &Context) -> Result<()> {
        self.apt_get(ctx, Operation::Clean, argv(&["clean"]), &[])?;
        Ok(())
    }

    fn auto_remove(&self, ctx: &Context) -> Result<()> {
        self.apt_get(ctx, Operation::AutoRemove, argv(&["autoremove", "-y"]), &[])?;
        Ok(())
    }

    fn verify(&self, ctx: &Context, name: &str) -> Result<bool> {
        validate_package_name(name)?;
        let result = self.runner.run(ctx, "dpkg", &argv(&["--verify", name]))?;
        let text = result.combined_text();
        if text.contains("is not installed") {
            return Err(PackageError::new(ErrorKind::PackageNotInstalled, Operation::Verify)
                .with_target(name)
                .with_cause(text)
                .into());
        }
        Ok(result.success() && parsers::verify_clean(&result.stdout_text()))
    }
}

#[cfg(test)]
mod tests;
