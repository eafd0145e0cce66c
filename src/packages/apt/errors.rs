use crate::error::{ErrorKind, Operation, PackageError};
use crate::execution::CommandResult;
use crate::packages::classify::{Classifier, Rule};
use std::sync::LazyLock;

static CLASSIFIER: LazyLock<Classifier> = LazyLock::new(|| {
    use ErrorKind::*;
    Classifier::new(vec![
        Rule::new(LockUnavailable, r"could not get lock"),
        Rule::new(LockUnavailable, r"unable to acquire the dpkg frontend lock"),
        Rule::new(LockUnavailable, r"unable to lock (the )?(administration|download) directory"),
        Rule::new(LockUnavailable, r"is another process using it\?"),
        Rule::new(InsufficientSpace, r"you don't have enough free space"),
        Rule::new(InsufficientSpace, r"no space left on device"),
        Rule::new(VerificationFailed, r"NO_PUBKEY"),
        Rule::new(VerificationFailed, r"following signatures (couldn't be verified|were invalid)"),
        Rule::new(VerificationFailed, r"is not signed"),
        Rule::new(VerificationFailed, r"cannot be authenticated"),
        Rule::new(PackageNotFound, r"unable to locate package (?P<name>\S+)"),
        Rule::new(PackageNotFound, r"package '?(?P<name>[^' ]+)'? has no installation candidate"),
        Rule::new(PackageNotFound, r"couldn't find any package by (glob|regex) '(?P<name>[^']+)'"),
        Rule::new(PackageNotFound, r"no packages found"),
        Rule::new(PackageNotInstalled, r"package '(?P<name>[^']+)' is not installed"),
        Rule::new(DependencyConflict, r"unmet dependencies"),
        Rule::new(DependencyConflict, r"held broken packages"),
        Rule::new(DependencyConflict, r"breaks:|conflicts:"),
        Rule::new(NetworkUnavailable, r"temporary failure resolving"),
        Rule::new(NetworkUnavailable, r"could not resolve"),
        Rule::new(NetworkUnavailable, r"failed to fetch"),
        Rule::new(NetworkUnavailable, r"unable to connect to"),
        Rule::new(NetworkUnavailable, r"network is unreachable"),
    ])
});

pub fn classify(operation: Operation, result: &CommandResult, targets: &[String]) -> PackageError {
    CLASSIFIER.classify(operation, result, targets)
}
