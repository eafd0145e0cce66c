//! Arch Linux and derivatives: `pacman`, plus `pacman-key` for the keyring.
//!
//! Repositories live as sections of `/etc/pacman.conf`; adding appends a
//! section, removing and toggling rewrite it in place with `sed`.

pub mod errors;
pub mod parsers;

use crate::core::types::{
    BackendKind, InstallOptions, Package, RemoveOptions, Repository, SearchOptions, UpdateOptions,
};
use crate::error::{ErrorKind, Operation, PackageError, Result};
use crate::execution::{CommandResult, Context, Runner};
use crate::packages::traits::PackageManager;
use crate::packages::{argv, finish_search};
use crate::utils::sanitize::{
    sed_escape, validate_key_id, validate_package_name, validate_package_names, validate_query,
    validate_repository_fields, validate_repository_name,
};

const PACMAN_CONF: &str = "/etc/pacman.conf";

pub struct PacmanManager {
    runner: Runner,
}

impl PacmanManager {
    pub fn new(runner: Runner) -> Self {
        Self { runner }
    }

    fn pacman(
        &self,
        ctx: &Context,
        operation: Operation,
        args: Vec<String>,
        targets: &[String],
    ) -> Result<CommandResult> {
        let result = self.runner.run_elevated(ctx, "pacman", &args)?;
        if result.success() {
            Ok(result)
        } else {
            Err(errors::classify(operation, &result, targets).into())
        }
    }

    fn pacman_key(&self, ctx: &Context, args: Vec<String>, targets: &[String]) -> Result<()> {
        let result = self.runner.run_elevated(ctx, "pacman-key", &args)?;
        if !result.success() {
            return Err(errors::classify(Operation::Keyring, &result, targets).into());
        }
        Ok(())
    }

    fn configured_repositories(&self, ctx: &Context) -> Result<Vec<Repository>> {
        let result = self.runner.run(ctx, "cat", &argv(&[PACMAN_CONF]))?;
        if !result.success() {
            return Err(errors::classify(Operation::ListRepositories, &result, &[]).into());
        }
        Ok(parsers::parse_conf(&result.stdout_text()))
    }

    fn find_repository(&self, ctx: &Context, operation: Operation, name: &str) -> Result<Repository> {
        self.configured_repositories(ctx)?
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| {
                PackageError::new(ErrorKind::RepositoryNotFound, operation)
                    .with_target(name)
                    .into()
            })
    }

    fn sed_conf(&self, ctx: &Context, operation: Operation, name: &str, expr: String) -> Result<()> {
        let args = argv(&["-i", "-E", "-e", expr.as_str(), PACMAN_CONF]);
        let result = self.runner.run_elevated(ctx, "sed", &args)?;
        if !result.success() {
            return Err(errors::classify(operation, &result, &[name.to_string()]).into());
        }
        Ok(())
    }

    fn toggle_repository(&self, ctx: &Context, name: &str, enable: bool) -> Result<()> {
        let operation = if enable {
            Operation::EnableRepository
        } else {
            Operation::DisableRepository
        };
        check_repository_name(operation, name)?;
        if self.find_repository(ctx, operation, name)?.enabled == enable {
            return Ok(());
        }

        let header = format!(r"\[{}\]", sed_escape(name));
        let expr = if enable {
            format!(r"/^#{0}/,/^#?\[/s/^#({0}|[A-Za-z]+ *=)/\1/", header)
        } else {
            format!(r"/^{0}/,/^#?\[/s/^({0}|[A-Za-z]+ *=)/#\1/", header)
        };
        self.sed_conf(ctx, operation, name, expr)
    }

    /// `pacman-key --recv-keys`: fetch a key from the keyserver.
    pub fn receive_key(&self, ctx: &Context, key: &str) -> Result<()> {
        validate_key_id(key)?;
        self.pacman_key(ctx, argv(&["--recv-keys", key]), &[key.to_string()])
    }

    /// `pacman-key --lsign-key`: trust a key for package signatures.
    pub fn locally_sign_key(&self, ctx: &Context, key: &str) -> Result<()> {
        validate_key_id(key)?;
        self.pacman_key(ctx, argv(&["--lsign-key", key]), &[key.to_string()])
    }

    /// `pacman-key --populate`, for all shipped keyrings when `keyrings` is empty.
    pub fn populate_keyring(&self, ctx: &Context, keyrings: &[String]) -> Result<()> {
        validate_package_names(keyrings)?;
        let mut args = argv(&["--populate"]);
        args.extend(keyrings.iter().cloned());
        self.pacman_key(ctx, args, keyrings)
    }

    pub fn refresh_keys(&self, ctx: &Context) -> Result<()> {
        self.pacman_key(ctx, argv(&["--refresh-keys"]), &[])
    }
}

/// `[options]` is pacman's own section, never a repository.
fn check_repository_name(operation: Operation, name: &str) -> Result<()> {
    validate_repository_name(name)?;
    if name == parsers::OPTIONS_SECTION {
        return Err(PackageError::new(ErrorKind::Unsupported, operation)
            .with_target(name)
            .with_cause("'options' is reserved by pacman.conf")
            .into());
    }
    Ok(())
}

impl PackageManager for PacmanManager {
    fn kind(&self) -> BackendKind {
        BackendKind::Pacman
    }

    fn is_available(&self) -> bool {
        which::which("pacman").is_ok()
    }

    fn install(&self, ctx: &Context, options: &InstallOptions, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        validate_package_names(packages)?;

        let mut args = argv(&["-S", "--noconfirm"]);
        if !options.reinstall {
            args.push("--needed".into());
        }
        if options.download_only {
            args.push("--downloadonly".into());
        }
        if options.force {
            args.push("--overwrite".into());
            args.push("*".into());
        }
        if options.quiet {
            args.push("-q".into());
        }
        args.extend(packages.iter().cloned());

        self.pacman(ctx, Operation::Install, args, packages)?;
        Ok(())
    }

    fn remove(&self, ctx: &Context, options: &RemoveOptions, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        validate_package_names(packages)?;

        let mut flag = String::from("-R");
        if options.auto_remove {
            flag.push('s');
        }
        if options.purge {
            flag.push('n');
        }
        if options.force {
            flag.push_str("dd");
        }
        let mut args = vec![flag, "--noconfirm".to_string()];
        if options.quiet {
            args.push("-q".into());
        }
        args.extend(packages.iter().cloned());

        self.pacman(ctx, Operation::Remove, args, packages)?;
        Ok(())
    }

    fn update(&self, ctx: &Context, _options: &UpdateOptions) -> Result<()> {
        self.pacman(ctx, Operation::Update, argv(&["-Sy", "--noconfirm"]), &[])?;
        Ok(())
    }

    fn upgrade(&self, ctx: &Context, options: &UpdateOptions, packages: &[String]) -> Result<()> {
        validate_package_names(packages)?;

        let verb = if packages.is_empty() { "-Syu" } else { "-S" };
        let mut args = argv(&[verb, "--noconfirm"]);
        if options.download_only {
            args.push("--downloadonly".into());
        }
        if options.quiet {
            args.push("-q".into());
        }
        args.extend(packages.iter().cloned());

        self.pacman(ctx, Operation::Upgrade, args, packages)?;
        Ok(())
    }

    fn is_installed(&self, ctx: &Context, name: &str) -> Result<bool> {
        validate_package_name(name)?;
        let result = self.runner.run(ctx, "pacman", &argv(&["-Q", name]))?;
        match result.exit_code {
            0 => Ok(true),
            1 => Ok(false),
            _ => Err(errors::classify(Operation::IsInstalled, &result, &[name.to_string()]).into()),
        }
    }

    fn search(&self, ctx: &Context, query: &str, options: &SearchOptions) -> Result<Vec<Package>> {
        validate_query(query)?;
        let result = self.runner.run(ctx, "pacman", &argv(&["-Ss", query]))?;
        if !result.success() {
            // exit 1 without output: nothing matched
            if result.exit_code == 1 && result.combined_text().trim().is_empty() {
                return Ok(Vec::new());
            }
            return Err(errors::classify(Operation::Search, &result, &[]).into());
        }

        let found = parsers::parse_search(&result.stdout_text());
        Ok(finish_search(self, ctx, query, options, found))
    }

    fn info(&self, ctx: &Context, name: &str) -> Result<Package> {
        validate_package_name(name)?;
        let targets = [name.to_string()];

        let local = self.runner.run(ctx, "pacman", &argv(&["-Qi", name]))?;
        let (result, installed) = if local.success() {
            (local, true)
        } else {
            (self.runner.run(ctx, "pacman", &argv(&["-Si", name]))?, false)
        };
        if !result.success() {
            return Err(errors::classify(Operation::Info, &result, &targets).into());
        }

        parsers::parse_info(&result.stdout_text(), installed)
            .into_iter()
            .next()
            .ok_or_else(|| {
                PackageError::new(ErrorKind::PackageNotFound, Operation::Info)
                    .with_target(name)
                    .into()
            })
    }

    fn list_installed(&self, ctx: &Context) -> Result<Vec<Package>> {
        let result = self.runner.run(ctx, "pacman", &argv(&["-Q"]))?;
        if !result.success() {
            return Err(errors::classify(Operation::ListInstalled, &result, &[]).into());
        }
        Ok(parsers::parse_installed(&result.stdout_text()))
    }

    fn list_upgradable(&self, ctx: &Context) -> Result<Vec<Package>> {
        let result = self.runner.run(ctx, "pacman", &argv(&["-Qu"]))?;
        match result.exit_code {
            0 => Ok(parsers::parse_upgradable(&result.stdout_text())),
            1 if result.stderr_text().trim().is_empty() => Ok(Vec::new()),
            _ => Err(errors::classify(Operation::ListUpgradable, &result, &[]).into()),
        }
    }

    fn add_repository(&self, ctx: &Context, repo: &Repository) -> Result<()> {
        check_repository_name(Operation::AddRepository, &repo.name)?;
        validate_repository_fields(repo)?;
        if let Some(key) = &repo.gpg_key {
            validate_key_id(key)?;
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

        let section = parsers::render_section(repo);
        let result = self.runner.run_elevated_with_input(
            ctx,
            section.as_bytes(),
            "tee",
            &argv(&["-a", PACMAN_CONF]),
        )?;
        if !result.success() {
            return Err(
                errors::classify(Operation::AddRepository, &result, &[repo.name.clone()]).into(),
            );
        }

        if let Some(key) = &repo.gpg_key {
            self.receive_key(ctx, key)?;
            self.locally_sign_key(ctx, key)?;
        }
        Ok(())
    }

    fn remove_repository(&self, ctx: &Context, name: &str) -> Result<()> {
        check_repository_name(Operation::RemoveRepository, name)?;
        self.find_repository(ctx, Operation::RemoveRepository, name)?;

        self.sed_conf(
            ctx,
            Operation::RemoveRepository,
            name,
            remove_section_expr(name),
        )
    }

    fn list_repositories(&self, ctx: &Context) -> Result<Vec<Repository>> {
        self.configured_repositories(ctx)
    }

    fn enable_repository(&self, ctx: &Context, name: &str) -> Result<()> {
        self.toggle_repository(ctx, name, true)
    }

    fn disable_repository(&self, ctx: &Context, name: &str) -> Result<()> {
        self.toggle_repository(ctx, name, false)
    }

    fn refresh_repositories(&self, ctx: &Context) -> Result<()> {
        self.pacman(ctx, Operation::RefreshRepositories, argv(&["-Sy", "--noconfirm"]), &[])?;
        Ok(())
    }

    fn clean(&self, ctx: &Context) -> Result<()> {
        self.pacman(ctx, Operation::Clean, argv(&["-Sc", "--noconfirm"]), &[])?;
        Ok(())
    }

    fn auto_remove(&self, ctx: &Context) -> Result<()> {
        let orphans = self.runner.run(ctx, "pacman", &argv(&["-Qdtq"]))?;
        let names: Vec<String> = match orphans.exit_code {
            0 => orphans
                .stdout_text()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            1 if orphans.stderr_text().trim().is_empty() => Vec::new(),
            _ => return Err(errors::classify(Operation::AutoRemove, &orphans, &[]).into()),
        };
        if names.is_empty() {
            return Ok(());
        }

        let mut args = argv(&["-Rns", "--noconfirm"]);
        args.extend(names.iter().cloned());
        self.pacman(ctx, Operation::AutoRemove, args, &names)?;
        Ok(())
    }

    fn verify(&self, ctx: &Context, name: &str) -> Result<bool> {
        validate_package_name(name)?;
        let result = self.runner.run(ctx, "pacman", &argv(&["-Qk", name]))?;
        if result.success() {
            return Ok(true);
        }
        if result.combined_text().contains("was not found") {
            return Err(errors::classify(Operation::Verify, &result, &[name.to_string()]).into());
        }
        Ok(false)
    }
}

/// `sed -E` program deleting a section from its header up to the next blank
/// line or header, so comment blocks introducing the next section survive.
fn remove_section_expr(name: &str) -> String {
    let header = format!(r"^#?\[{}\]", sed_escape(name));
    format!(r"/{0}/,/^[[:space:]]*$|^#?\[/{{/{0}/d;/^#?\[/!d}}", header)
}
