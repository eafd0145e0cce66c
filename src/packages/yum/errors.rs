use crate::error::{ErrorKind, Operation, PackageError};
use crate::execution::CommandResult;
use crate::packages::classify::{Classifier, Rule};
use std::sync::LazyLock;

static CLASSIFIER: LazyLock<Classifier> = LazyLock::new(|| {
    use ErrorKind::*;
    Classifier::new(vec![
        Rule::new(LockUnavailable, r"another app is currently holding the yum lock"),
        Rule::new(LockUnavailable, r"existing lock /var/run/yum\.pid"),
        Rule::new(InsufficientSpace, r"at least \S+ more space needed"),
        Rule::new(InsufficientSpace, r"insufficient space in download directory"),
        Rule::new(InsufficientSpace, r"no space left on device"),
        Rule::new(VerificationFailed, r"public key for \S+ is not installed"),
        Rule::new(VerificationFailed, r"gpg key retrieval failed"),
        Rule::new(VerificationFailed, r"package \S+ is not signed"),
        Rule::new(VerificationFailed, r"bad gpg signature"),
        Rule::new(PackageNotInstalled, r"no match for argument: (?P<name>\S+)")
            .only(&[Operation::Remove]),
        Rule::new(PackageNotInstalled, r"no packages marked for removal"),
        Rule::new(PackageNotInstalled, r"package (?P<name>\S+) is not installed"),
        Rule::new(PackageNotFound, r"no package (?P<name>\S+) available"),
        Rule::new(PackageNotFound, r"no match for argument: (?P<name>\S+)"),
        Rule::new(PackageNotFound, r"no matching packages to list"),
        Rule::new(PackageAlreadyInstalled, r"package (?P<name>\S+) already installed"),
        Rule::new(RepositoryNotFound, r"error getting repository data for (?P<name>\S+)"),
        Rule::new(NetworkUnavailable, r"cannot retrieve repository metadata"),
        Rule::new(NetworkUnavailable, r"cannot find a valid baseurl"),
        Rule::new(NetworkUnavailable, r"could(n't| not) resolve"),
        Rule::new(NetworkUnavailable, r"curl error"),
        Rule::new(NetworkUnavailable, r"timeout was reached"),
        Rule::new(DependencyConflict, r"requires: \S+"),
        Rule::new(DependencyConflict, r"conflicts with"),
        Rule::new(DependencyConflict, r"protected multilib versions"),
        Rule::new(DependencyConflict, r"you could try using --skip-broken"),
    ])
});

pub fn classify(operation: Operation, result: &CommandResult, targets: &[String]) -> PackageError {
    CLASSIFIER.classify(operation, result, targets)
}
