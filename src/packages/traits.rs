use crate::core::types::{
    BackendKind, Family, InstallOptions, Package, RemoveOptions, Repository, SearchOptions,
    UpdateOptions,
};
use crate::error::Result;
use crate::execution::Context;

/// The operation set every backend manager exposes.
///
/// Implementations hold only their [`crate::execution::Runner`] after
/// construction and are safe to share between threads. Mutating calls are
/// elevated; queries are not.
pub trait PackageManager: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Name of the native tool (`apt`, `dnf`, ...).
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn family(&self) -> Family {
        self.kind().family()
    }

    /// Whether the native binary is on `PATH`. Never elevates.
    fn is_available(&self) -> bool;

    /// Install packages. An empty list succeeds without running anything.
    fn install(&self, ctx: &Context, options: &InstallOptions, packages: &[String]) -> Result<()>;

    /// Remove packages. An empty list succeeds without running anything.
    fn remove(&self, ctx: &Context, options: &RemoveOptions, packages: &[String]) -> Result<()>;

    /// Refresh package metadata.
    fn update(&self, ctx: &Context, options: &UpdateOptions) -> Result<()>;

    /// Upgrade the given packages, or everything when the list is empty.
    fn upgrade(&self, ctx: &Context, options: &UpdateOptions, packages: &[String]) -> Result<()>;

    /// `Ok(false)` when the backend reports the package as absent; an error
    /// only when the query itself could not be answered.
    fn is_installed(&self, ctx: &Context, name: &str) -> Result<bool>;

    /// "No matches" is an empty list, never an error.
    fn search(&self, ctx: &Context, query: &str, options: &SearchOptions) -> Result<Vec<Package>>;

    fn info(&self, ctx: &Context, name: &str) -> Result<Package>;

    fn list_installed(&self, ctx: &Context) -> Result<Vec<Package>>;

    fn list_upgradable(&self, ctx: &Context) -> Result<Vec<Package>>;

    fn add_repository(&self, ctx: &Context, repo: &Repository) -> Result<()>;

    fn remove_repository(&self, ctx: &Context, name: &str) -> Result<()>;

    fn list_repositories(&self, ctx: &Context) -> Result<Vec<Repository>>;

    fn enable_repository(&self, ctx: &Context, name: &str) -> Result<()>;

    fn disable_repository(&self, ctx: &Context, name: &str) -> Result<()>;

    fn refresh_repositories(&self, ctx: &Context) -> Result<()>;

    /// Drop cached package files.
    fn clean(&self, ctx: &Context) -> Result<()>;

    /// Remove dependencies nothing depends on anymore.
    fn auto_remove(&self, ctx: &Context) -> Result<()>;

    /// Check installed files against the package database.
    fn verify(&self, ctx: &Context, name: &str) -> Result<bool>;
}
