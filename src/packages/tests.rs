use super::*;
use crate::core::types::Package;
use crate::error::ErrorKind;
use crate::execution::{ElevationMethod, RecordingExecutor, Runner, SystemElevator};
use std::sync::Arc;

fn manager() -> (Arc<RecordingExecutor>, DnfManager) {
    let exec = Arc::new(RecordingExecutor::new());
    let runner = Runner::new(
        exec.clone(),
        Arc::new(SystemElevator::new(false, Some(ElevationMethod::Sudo))),
    );
    (exec, DnfManager::new(runner))
}

fn packages(list: &[&str]) -> Vec<Package> {
    list.iter().map(|name| Package::new(*name)).collect()
}

#[test]
fn test_remove_each_continues_past_failures() {
    let (exec, dnf) = manager();
    exec.respond_exit(
        "remove -y ghost",
        1,
        "",
        "No match for argument: ghost\nError: No packages marked for removal.\n",
    );
    let targets = vec!["htop".to_string(), "ghost".to_string(), "tmux".to_string()];

    let outcomes = remove_each(&dnf, &Context::new(), &RemoveOptions::default(), &targets);

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_ok());
    assert!(!outcomes[1].is_ok());
    assert!(outcomes[2].is_ok());
    assert_eq!(outcomes[1].package, "ghost");
    let err = outcomes[1].result.as_ref().unwrap_err();
    assert!(err.is(ErrorKind::PackageNotInstalled));
    assert_eq!(exec.count(), 3);
}

#[test]
fn test_remove_each_empty_list() {
    let (exec, dnf) = manager();
    let outcomes = remove_each(&dnf, &Context::new(), &RemoveOptions::default(), &[]);
    assert!(outcomes.is_empty());
    assert_eq!(exec.count(), 0);
}

#[test]
fn test_annotate_installed() {
    let (exec, dnf) = manager();
    exec.respond_exit("rpm -q missing", 1, "package missing is not installed\n", "");
    exec.respond_exit("rpm -q broken", 2, "", "error: rpmdb open failed\n");

    let mut found = packages(&["bash", "missing", "broken"]);
    found.push(Package {
        installed: true,
        ..Package::new("zsh")
    });
    annotate_installed(&dnf, &Context::new(), &mut found);

    assert!(found[0].installed);
    assert!(!found[1].installed);
    assert!(!found[2].installed);
    assert!(found[3].installed);
    assert!(exec.lines().iter().all(|l| !l.contains("zsh")));
    assert_eq!(exec.count(), 3);
}

#[test]
fn test_finish_search_exact_and_limit() {
    let (exec, dnf) = manager();
    let ctx = Context::new();
    let raw = packages(&["curl", "curlftpfs", "libcurl", "curl"]);

    let exact = SearchOptions {
        exact: true,
        ..Default::default()
    };
    let result = finish_search(&dnf, &ctx, "curl", &exact, raw.clone());
    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|p| p.name == "curl"));

    let limited = SearchOptions {
        limit: Some(2),
        ..Default::default()
    };
    let result = finish_search(&dnf, &ctx, "curl", &limited, raw);
    assert_eq!(result.len(), 2);
    assert_eq!(exec.count(), 0);
}

#[test]
fn test_finish_search_annotates_when_asked() {
    let (exec, dnf) = manager();
    exec.respond_exit("rpm -q libcurl", 1, "", "");
    let options = SearchOptions {
        include_installed: true,
        ..Default::default()
    };

    let result = finish_search(
        &dnf,
        &Context::new(),
        "curl",
        &options,
        packages(&["curl", "libcurl"]),
    );

    assert!(result[0].installed);
    assert!(!result[1].installed);
    assert_eq!(exec.count(), 2);
}

#[test]
fn test_argv() {
    assert_eq!(argv(&["-S", "--noconfirm"]), vec!["-S".to_string(), "--noconfirm".to_string()]);
    assert!(argv(&[]).is_empty());
}
