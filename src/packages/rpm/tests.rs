use super::*;
use crate::execution::{ElevationMethod, RecordingExecutor, SystemElevator};
use std::sync::Arc;

fn runner(exec: &Arc<RecordingExecutor>) -> Runner {
    Runner::new(
        exec.clone(),
        Arc::new(SystemElevator::new(false, Some(ElevationMethod::Sudo))),
    )
}

#[test]
fn test_parse_installed_drops_short_lines() {
    let packages = parse_installed("pkgname\ncurl 7.76.1-23.el9 x86_64");
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].name, "curl");
    assert_eq!(packages[0].version, "7.76.1-23.el9");
    assert_eq!(packages[0].architecture, "x86_64");
    assert_eq!(packages[0].size_bytes, 0);
    assert!(packages[0].installed);
}

#[test]
fn test_parse_installed_epochs_and_sizes() {
    let text = "\
bash 0:5.1.8-6.el9 x86_64 7738634
openssl 1:3.0.7-27.el9 x86_64 1825232
gpg-pubkey 0:8483c65d-5ccc5b19 (none) 0
";
    let packages = parse_installed(text);
    assert_eq!(packages.len(), 3);
    assert_eq!(packages[0].version, "5.1.8-6.el9");
    assert_eq!(packages[0].size_bytes, 7_738_634);
    assert_eq!(packages[1].version, "1:3.0.7-27.el9");
    assert_eq!(packages[2].architecture, "(none)");
}

#[test]
fn test_parse_installed_empty() {
    assert!(parse_installed("").is_empty());
}

#[test]
fn test_is_installed_exit_codes() {
    let exec = Arc::new(RecordingExecutor::new());
    exec.respond_ok("rpm -q bash", "bash-5.1.8-6.el9.x86_64\n");
    exec.respond_exit("rpm -q nope", 1, "package nope is not installed\n", "");
    exec.respond_exit("rpm -q broken", 2, "", "error: rpmdb: BDB0113 Thread/process failed");
    let runner = runner(&exec);
    let ctx = Context::new();

    assert!(is_installed(&runner, &ctx, "bash").unwrap());
    assert!(!is_installed(&runner, &ctx, "nope").unwrap());

    let err = is_installed(&runner, &ctx, "broken").unwrap_err();
    assert!(err.is(ErrorKind::OperationFailed));
}

#[test]
fn test_list_installed_passes_query_format() {
    let exec = Arc::new(RecordingExecutor::new());
    exec.respond_ok("rpm -qa", "curl 0:7.76.1-23.el9 x86_64 120\n");
    let runner = runner(&exec);

    let packages = list_installed(&runner, &Context::new()).unwrap();
    assert_eq!(packages.len(), 1);

    let calls = exec.invocations();
    assert_eq!(calls[0].command, "rpm");
    assert_eq!(calls[0].args, vec!["-qa", "--qf", QUERY_FORMAT]);
}

#[test]
fn test_verify_outcomes() {
    let exec = Arc::new(RecordingExecutor::new());
    exec.respond_exit("rpm -V changed", 1, "S.5....T.  c /etc/changed.conf\n", "");
    exec.respond_exit("rpm -V ghost", 1, "package ghost is not installed\n", "");
    let runner = runner(&exec);
    let ctx = Context::new();

    assert!(verify(&runner, &ctx, "clean").unwrap());
    assert!(!verify(&runner, &ctx, "changed").unwrap());
    assert!(
        verify(&runner, &ctx, "ghost")
            .unwrap_err()
            .is(ErrorKind::PackageNotInstalled)
    );
}
