use super::*;
use crate::execution::{ElevationMethod, RecordingExecutor, Runner, SystemElevator};
use crate::packages::ZypperManager;
use std::sync::Arc;

#[test]
fn limit_parsing() {
    assert_eq!(parse_limit(None).unwrap(), Some(50));
    assert_eq!(parse_limit(Some("all")).unwrap(), None);
    assert_eq!(parse_limit(Some("0")).unwrap(), None);
    assert_eq!(parse_limit(Some("5")).unwrap(), Some(5));
    assert!(parse_limit(Some("-1")).is_err());
    assert!(parse_limit(Some("many")).is_err());
}

#[test]
fn search_with_no_matches_is_not_an_error() {
    let exec = Arc::new(RecordingExecutor::new());
    exec.respond_exit("zypper", 104, "No matching items found.\n", "");
    let manager = ZypperManager::new(Runner::new(
        exec.clone(),
        Arc::new(SystemElevator::new(false, Some(ElevationMethod::Sudo))),
    ));
    run(
        &manager,
        &Context::new(),
        "zzz",
        &SearchOptions::default(),
        false,
    )
    .unwrap();
    assert_eq!(exec.lines(), vec!["zypper --non-interactive search zzz"]);
}
