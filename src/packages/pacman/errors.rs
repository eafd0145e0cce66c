use crate::error::{ErrorKind, Operation, PackageError};
use crate::execution::CommandResult;
use crate::packages::classify::{Classifier, Rule};
use std::sync::LazyLock;

static CLASSIFIER: LazyLock<Classifier> = LazyLock::new(|| {
    use ErrorKind::*;
    use Operation::{Remove, Verify};
    Classifier::new(vec![
        Rule::new(LockUnavailable, r"unable to lock database"),
        Rule::new(LockUnavailable, r"could not lock database"),
        Rule::new(InsufficientSpace, r"not enough free disk space"),
        Rule::new(InsufficientSpace, r"no space left on device"),
        Rule::new(VerificationFailed, r"invalid or corrupted package \(pgp signature\)"),
        Rule::new(VerificationFailed, r"signature from .* is (unknown trust|invalid|marginal trust)"),
        Rule::new(VerificationFailed, r"required key missing from keyring"),
        Rule::new(VerificationFailed, r"key .* could not be looked up remotely"),
        Rule::new(PackageNotInstalled, r"target not found: (?P<name>\S+)").only(&[Remove]),
        Rule::new(PackageNotInstalled, r"package '(?P<name>[^']+)' was not found")
            .only(&[Remove, Verify]),
        Rule::new(PackageNotFound, r"target not found: (?P<name>\S+)"),
        Rule::new(PackageNotFound, r"package '(?P<name>[^']+)' was not found"),
        Rule::new(RepositoryNotFound, r"database '(?P<name>[^']+)' (not found|does not exist)"),
        Rule::new(NetworkUnavailable, r"failed retrieving file"),
        Rule::new(NetworkUnavailable, r"failed to synchronize all databases"),
        Rule::new(NetworkUnavailable, r"could(n't| not) resolve"),
        Rule::new(NetworkUnavailable, r"connection timed out"),
        Rule::new(NetworkUnavailable, r"operation too slow"),
        Rule::new(DependencyConflict, r"unable to satisfy dependency"),
        Rule::new(DependencyConflict, r"could not satisfy dependencies"),
        Rule::new(DependencyConflict, r"conflicting dependencies"),
        Rule::new(DependencyConflict, r"are in conflict"),
        Rule::new(DependencyConflict, r"breaks dependency"),
    ])
});

pub fn classify(operation: Operation, result: &CommandResult, targets: &[String]) -> PackageError {
    CLASSIFIER.classify(operation, result, targets)
}
