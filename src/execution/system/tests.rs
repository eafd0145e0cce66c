use super::*;
use std::time::Instant;

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_captures_exit_code_and_streams() {
    let exec = SystemExecutor::new();
    let result = exec
        .execute(
            &Context::new(),
            "sh",
            &args(&["-c", "echo out; echo err >&2; exit 3"]),
        )
        .expect("execute");

    assert_eq!(result.exit_code, 3);
    assert_eq!(result.stdout_text(), "out\n");
    assert_eq!(result.stderr_text(), "err\n");
}

#[test]
fn test_pipes_input_to_stdin() {
    let exec = SystemExecutor::new();
    let result = exec
        .execute_with_input(&Context::new(), b"[extra]\nServer = x\n", "cat", &[])
        .expect("execute");

    assert!(result.success());
    assert_eq!(result.stdout_text(), "[extra]\nServer = x\n");
}

#[test]
fn test_missing_binary_is_spawn_error() {
    let exec = SystemExecutor::new();
    let result = exec.execute(&Context::new(), "definitely-not-a-real-binary-xyz", &[]);
    assert!(matches!(result, Err(ExecutionError::Spawn { .. })));
}

#[test]
fn test_cancelled_context_never_spawns() {
    let exec = SystemExecutor::new();
    let ctx = Context::new();
    ctx.cancel();
    let result = exec.execute(&ctx, "true", &[]);
    assert!(matches!(result, Err(ExecutionError::Cancelled)));
}

#[test]
fn test_deadline_kills_running_child() {
    let exec = SystemExecutor::new();
    let ctx = Context::new().with_timeout(Duration::from_millis(200));
    let start = Instant::now();

    let result = exec.execute(&ctx, "sleep", &args(&["30"]));

    assert!(matches!(result, Err(ExecutionError::TimedOut { .. })));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_cancel_from_another_thread_aborts_promptly() {
    let exec = SystemExecutor::new();
    let ctx = Context::new();
    let canceller = ctx.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(150));
        canceller.cancel();
    });
    let start = Instant::now();

    let result = exec.execute(&ctx, "sleep", &args(&["30"]));
    handle.join().expect("join");

    assert!(matches!(result, Err(ExecutionError::Cancelled)));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_cancel_reaches_grandchild_behind_wrapper() {
    // `sh` forks `sleep`, which inherits and holds the output pipes.
    let exec = SystemExecutor::new();
    let ctx = Context::new();
    let canceller = ctx.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        canceller.cancel();
    });
    let start = Instant::now();

    let result = exec.execute(&ctx, "sh", &args(&["-c", "sleep 4; echo done"]));
    handle.join().expect("join");

    assert!(matches!(result, Err(ExecutionError::Cancelled)));
    assert!(
        start.elapsed() < Duration::from_secs(3),
        "cancellation took {:?}",
        start.elapsed()
    );
}

#[test]
fn test_deadline_reaches_grandchild_behind_wrapper() {
    let exec = SystemExecutor::new();
    let ctx = Context::new().with_timeout(Duration::from_millis(200));
    let start = Instant::now();

    let result = exec.execute(&ctx, "sh", &args(&["-c", "sleep 4; echo done"]));

    assert!(matches!(result, Err(ExecutionError::TimedOut { .. })));
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[test]
fn test_sigterm_ignoring_group_is_killed() {
    let exec = SystemExecutor::new();
    let ctx = Context::new().with_timeout(Duration::from_millis(200));
    let start = Instant::now();

    let result = exec.execute(
        &ctx,
        "sh",
        &args(&["-c", "trap '' TERM; sleep 4; echo done"]),
    );

    assert!(matches!(result, Err(ExecutionError::TimedOut { .. })));
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[test]
fn test_only_non_elevated_commands_get_own_group() {
    assert!(is_elevation_wrapper("sudo"));
    assert!(is_elevation_wrapper("doas"));
    assert!(is_elevation_wrapper("pkexec"));
    assert!(!is_elevation_wrapper("dnf"));
    assert!(!is_elevation_wrapper("sh"));
}
