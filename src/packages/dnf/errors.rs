use crate::error::{ErrorKind, Operation, PackageError};
use crate::execution::CommandResult;
use crate::packages::classify::{Classifier, Rule};
use std::sync::LazyLock;

/// dnf exits with 200 when another process holds the rpm lock.
const LOCK_EXIT_CODE: i32 = 200;

static CLASSIFIER: LazyLock<Classifier> = LazyLock::new(|| {
    use ErrorKind::*;
    Classifier::new(vec![
        Rule::new(LockUnavailable, r"waiting for process with pid"),
        Rule::new(LockUnavailable, r"failed to obtain the transaction lock"),
        Rule::new(InsufficientSpace, r"at least \S+ more space needed"),
        Rule::new(InsufficientSpace, r"disk requirements"),
        Rule::new(InsufficientSpace, r"no space left on device"),
        Rule::new(VerificationFailed, r"gpg check failed"),
        Rule::new(VerificationFailed, r"public key for \S+ is not installed"),
        Rule::new(VerificationFailed, r"gpg key .* failed"),
        Rule::new(VerificationFailed, r"signature .* (bad|invalid|not ok)"),
        Rule::new(PackageNotInstalled, r"no match for argument: (?P<name>\S+)")
            .only(&[Operation::Remove]),
        Rule::new(PackageNotInstalled, r"no packages marked for removal"),
        Rule::new(PackageNotInstalled, r"package (?P<name>\S+) is not installed"),
        Rule::new(PackageNotFound, r"no match for argument: (?P<name>\S+)"),
        Rule::new(PackageNotFound, r"unable to find a match: (?P<name>\S+)"),
        Rule::new(PackageNotFound, r"no matching packages to list"),
        Rule::new(PackageNotFound, r"no package (?P<name>\S+) available"),
        Rule::new(PackageAlreadyInstalled, r"package (?P<name>\S+) is already installed"),
        Rule::new(RepositoryNotFound, r"no matching repo to modify"),
        Rule::new(RepositoryNotFound, r"unknown repo: '(?P<name>[^']+)'"),
        Rule::new(NetworkUnavailable, r"could(n't| not) resolve"),
        Rule::new(NetworkUnavailable, r"curl error"),
        Rule::new(NetworkUnavailable, r"failed to download metadata"),
        Rule::new(NetworkUnavailable, r"cannot download"),
        Rule::new(NetworkUnavailable, r"timeout was reached"),
        Rule::new(DependencyConflict, r"conflicting requests"),
        Rule::new(DependencyConflict, r"nothing provides"),
        Rule::new(DependencyConflict, r"none of the providers can be installed"),
        Rule::new(DependencyConflict, r"conflicts with"),
    ])
});

pub fn classify(operation: Operation, result: &CommandResult, targets: &[String]) -> PackageError {
    if result.exit_code == LOCK_EXIT_CODE {
        return PackageError::new(ErrorKind::LockUnavailable, operation)
            .with_cause(result.combined_text());
    }
    CLASSIFIER.classify(operation, result, targets)
}
