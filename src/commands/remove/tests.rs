use super::*;
use crate::error::ErrorKind;
use crate::execution::{ElevationMethod, RecordingExecutor, Runner, SystemElevator};
use crate::packages::AptManager;
use std::sync::Arc;

fn apt() -> (Arc<RecordingExecutor>, AptManager) {
    let exec = Arc::new(RecordingExecutor::new());
    let runner = Runner::new(
        exec.clone(),
        Arc::new(SystemElevator::new(false, Some(ElevationMethod::Sudo))),
    );
    (exec, AptManager::new(runner))
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn single_failure_keeps_its_kind() {
    let (exec, manager) = apt();
    exec.respond_exit(
        "apt-get remove -y ghost",
        100,
        "",
        "E: Unable to locate package ghost\n",
    );
    let err = run(
        &manager,
        &Context::new(),
        &RemoveOptions::default(),
        &names(&["ghost"]),
        false,
    )
    .unwrap_err();
    assert!(err.is(ErrorKind::PackageNotFound));
}

#[test]
fn batch_continues_and_summarises() {
    let (exec, manager) = apt();
    exec.respond_exit(
        "apt-get remove -y ghost",
        100,
        "",
        "E: Unable to locate package ghost\n",
    );
    let err = run(
        &manager,
        &Context::new(),
        &RemoveOptions::default(),
        &names(&["vim", "ghost", "nano"]),
        true,
    )
    .unwrap_err();
    assert!(matches!(err, DistroPkgError::Other(ref m) if m.starts_with("1 of 3")));
    assert_eq!(exec.count(), 3);
}

#[test]
fn all_removed() {
    let (exec, manager) = apt();
    run(
        &manager,
        &Context::new(),
        &RemoveOptions::default(),
        &names(&["vim", "nano"]),
        false,
    )
    .unwrap();
    assert_eq!(
        exec.lines(),
        vec!["sudo apt-get remove -y vim", "sudo apt-get remove -y nano"]
    );
}
