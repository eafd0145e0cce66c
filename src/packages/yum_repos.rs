//! `/etc/yum.repos.d` handling shared by the dnf and yum backends.
//!
//! Each helper takes the calling backend's classifier so failures are
//! reported in that backend's terms.

use crate::core::types::Repository;
use crate::error::{ErrorKind, Operation, PackageError, Result};
use crate::execution::{CommandResult, Context, Runner};
use crate::packages::argv;
use crate::packages::parsers::repo_file::{LocatedRepository, parse_repo_files, render_repo_file};
use crate::utils::sanitize::sed_escape;

pub const REPO_DIR: &str = "/etc/yum.repos.d";

/// A backend's failure classifier.
pub type ClassifyFn = fn(Operation, &CommandResult, &[String]) -> PackageError;

/// Every section of every `.repo` file, tagged with its file.
pub fn locate(runner: &Runner, ctx: &Context, classify: ClassifyFn) -> Result<Vec<LocatedRepository>> {
    let args = argv(&["-rsH", "--include=*.repo", "^", REPO_DIR]);
    let result = runner.run(ctx, "grep", &args)?;
    // grep: 1 means no lines matched, 2 means unreadable files were skipped
    if result.exit_code > 2 {
        return Err(classify(Operation::ListRepositories, &result, &[]).into());
    }
    Ok(parse_repo_files(&result.stdout_text()))
}

pub fn list(runner: &Runner, ctx: &Context, classify: ClassifyFn) -> Result<Vec<Repository>> {
    Ok(locate(runner, ctx, classify)?
        .into_iter()
        .map(|r| r.repository)
        .collect())
}

/// Fail with `RepositoryNotFound` unless a section named `name` exists.
pub fn require(
    runner: &Runner,
    ctx: &Context,
    operation: Operation,
    name: &str,
    classify: ClassifyFn,
) -> Result<()> {
    if locate(runner, ctx, classify)?
        .iter()
        .any(|r| r.repository.name == name)
    {
        Ok(())
    } else {
        Err(PackageError::new(ErrorKind::RepositoryNotFound, operation)
            .with_target(name)
            .into())
    }
}

/// Write `<REPO_DIR>/<name>.repo` for a repository that does not exist yet.
pub fn write(runner: &Runner, ctx: &Context, repo: &Repository, classify: ClassifyFn) -> Result<()> {
    if locate(runner, ctx, classify)?
        .iter()
        .any(|r| r.repository.name == repo.name)
    {
        return Err(
            PackageError::new(ErrorKind::RepositoryExists, Operation::AddRepository)
                .with_target(&repo.name)
                .into(),
        );
    }

    let path = format!("{}/{}.repo", REPO_DIR, repo.name);
    let content = render_repo_file(repo);
    let result =
        runner.run_elevated_with_input(ctx, content.as_bytes(), "tee", &argv(&[path.as_str()]))?;
    if !result.success() {
        return Err(classify(Operation::AddRepository, &result, &[repo.name.clone()]).into());
    }
    Ok(())
}

/// Delete the section `name`, or its whole file when it is the only one.
pub fn delete(runner: &Runner, ctx: &Context, name: &str, classify: ClassifyFn) -> Result<()> {
    let located = locate(runner, ctx, classify)?;
    let Some(target) = located.iter().find(|r| r.repository.name == name) else {
        return Err(
            PackageError::new(ErrorKind::RepositoryNotFound, Operation::RemoveRepository)
                .with_target(name)
                .into(),
        );
    };

    let siblings = located.iter().filter(|r| r.file == target.file).count();
    let (program, args) = if siblings == 1 {
        ("rm", argv(&["-f", target.file.as_str()]))
    } else {
        ("sed", argv(&["-i", "-E", "-e", section_delete_expr(name).as_str(), target.file.as_str()]))
    };

    let result = runner.run_elevated(ctx, program, &args)?;
    if !result.success() {
        return Err(classify(Operation::RemoveRepository, &result, &[name.to_string()]).into());
    }
    Ok(())
}

/// sed program deleting `[name]` and its keys up to the next section.
pub fn section_delete_expr(name: &str) -> String {
    let header = format!(r"^\[{}\]", sed_escape(name));
    format!(r"/{0}/,/^\[/{{/{0}/d;/^\[/!d}}", header)
}
