use crate::error::{ErrorKind, Operation, PackageError};
use crate::execution::CommandResult;
use crate::packages::classify::{Classifier, Rule};
use std::sync::LazyLock;

/// `ZYPPER_EXIT_ZYPP_LOCKED`
pub const LOCK_EXIT_CODE: i32 = 7;
/// `ZYPPER_EXIT_INF_CAP_NOT_FOUND`: a requested package or capability is unknown.
pub const CAP_NOT_FOUND_EXIT_CODE: i32 = 104;

/// 100-103 report pending updates or a needed reboot/restart, not failure.
pub fn is_success(exit_code: i32) -> bool {
    exit_code == 0 || (100..=103).contains(&exit_code)
}

static CLASSIFIER: LazyLock<Classifier> = LazyLock::new(|| {
    use ErrorKind::*;
    Classifier::new(vec![
        Rule::new(LockUnavailable, r"system management is locked"),
        Rule::new(LockUnavailable, r"zypp is locked"),
        Rule::new(InsufficientSpace, r"not enough (free )?disk space"),
        Rule::new(InsufficientSpace, r"no space left on device"),
        Rule::new(VerificationFailed, r"signature verification failed"),
        Rule::new(VerificationFailed, r"is signed with an unknown key"),
        Rule::new(VerificationFailed, r"has an invalid signature|invalid signature"),
        Rule::new(VerificationFailed, r"gpg check failed"),
        Rule::new(PackageNotInstalled, r"no provider of '(?P<name>[^']+)' found")
            .only(&[Operation::Remove]),
        Rule::new(PackageNotInstalled, r"package '(?P<name>[^']+)' is not installed"),
        Rule::new(PackageNotFound, r"no provider of '(?P<name>[^']+)' found"),
        Rule::new(PackageNotFound, r"package '(?P<name>[^']+)' not found"),
        Rule::new(PackageNotFound, r"'(?P<name>[^']+)' not found in package names"),
        Rule::new(PackageAlreadyInstalled, r"'(?P<name>[^']+)' is already installed"),
        Rule::new(RepositoryExists, r"repository named '(?P<name>[^']+)' already exists"),
        Rule::new(RepositoryNotFound, r"repository '(?P<name>[^']+)' not found"),
        Rule::new(NetworkUnavailable, r"download \(curl\) error"),
        Rule::new(NetworkUnavailable, r"could(n't| not) resolve"),
        Rule::new(NetworkUnavailable, r"timeout exceeded when accessing"),
        Rule::new(NetworkUnavailable, r"valid metadata not found at specified url"),
        Rule::new(NetworkUnavailable, r"problem retrieving (files|the repository index)"),
        Rule::new(DependencyConflict, r"nothing provides"),
        Rule::new(DependencyConflict, r"conflicts with"),
        Rule::new(DependencyConflict, r"cannot be provided"),
        Rule::new(DependencyConflict, r"dependency problem"),
    ])
});

pub fn classify(operation: Operation, result: &CommandResult, targets: &[String]) -> PackageError {
    if result.exit_code == LOCK_EXIT_CODE {
        return PackageError::new(ErrorKind::LockUnavailable, operation)
            .with_cause(result.combined_text());
    }
    CLASSIFIER.classify(operation, result, targets)
}
