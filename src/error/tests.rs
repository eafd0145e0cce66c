use super::*;
use std::error::Error as _;

#[test]
fn test_same_kind_compares_equal_regardless_of_decoration() {
    let a = PackageError::new(ErrorKind::PackageNotFound, Operation::Install)
        .with_target("curl")
        .with_cause("E: Unable to locate package curl");
    let b = PackageError::new(ErrorKind::PackageNotFound, Operation::Info).with_target("wget");

    assert_eq!(a, b);
    assert_eq!(a, ErrorKind::PackageNotFound);
}

#[test]
fn test_different_kinds_never_equal() {
    let a = PackageError::new(ErrorKind::PackageNotFound, Operation::Install);
    let b = PackageError::new(ErrorKind::InstallFailed, Operation::Install);

    assert_ne!(a, b);
    assert_ne!(a, ErrorKind::RepositoryNotFound);
}

#[test]
fn test_cause_is_exposed_as_source() {
    let err = PackageError::new(ErrorKind::LockUnavailable, Operation::Install)
        .with_cause("error: failed to init transaction (unable to lock database)\n");

    let source = err.source().expect("source");
    assert_eq!(
        source.to_string(),
        "error: failed to init transaction (unable to lock database)"
    );
    assert_eq!(
        err.cause(),
        Some("error: failed to init transaction (unable to lock database)")
    );
}

#[test]
fn test_blank_cause_is_dropped() {
    let err = PackageError::new(ErrorKind::UpdateFailed, Operation::Update).with_cause("  \n ");
    assert!(err.cause().is_none());
    assert!(err.source().is_none());
}

#[test]
fn test_display_includes_operation_target_and_first_cause_line() {
    let err = PackageError::new(ErrorKind::PackageNotFound, Operation::Install)
        .with_target("nosuchpkg")
        .with_cause("\nerror: target not found: nosuchpkg\nmore detail");

    assert_eq!(
        err.to_string(),
        "install: package not found 'nosuchpkg' (error: target not found: nosuchpkg)"
    );
}

#[test]
fn test_fallback_kinds_per_operation() {
    assert_eq!(Operation::Install.fallback_kind(), ErrorKind::InstallFailed);
    assert_eq!(Operation::Upgrade.fallback_kind(), ErrorKind::InstallFailed);
    assert_eq!(Operation::Remove.fallback_kind(), ErrorKind::RemoveFailed);
    assert_eq!(Operation::Update.fallback_kind(), ErrorKind::UpdateFailed);
    assert_eq!(Operation::Search.fallback_kind(), ErrorKind::OperationFailed);
}

#[test]
fn test_crate_error_exposes_kind() {
    let err: DistroPkgError =
        PackageError::new(ErrorKind::NetworkUnavailable, Operation::Update).into();
    assert_eq!(err.kind(), Some(ErrorKind::NetworkUnavailable));
    assert!(err.is(ErrorKind::NetworkUnavailable));

    let other = DistroPkgError::UnsupportedDistribution("gentoo".into());
    assert_eq!(other.kind(), None);
}
