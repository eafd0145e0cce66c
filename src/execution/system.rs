use super::{CommandResult, Context, ElevationMethod, Executor, render_command};
use crate::error::ExecutionError;
use nix::sys::signal::{Signal, kill, killpg};
use nix::unistd::Pid;
use std::io::{Read, Write};
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Time the process group gets to exit after SIGTERM before SIGKILL.
const TERMINATE_GRACE: Duration = Duration::from_millis(500);

/// Upper bound on waiting for pipe readers once the group was killed.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Runs real processes.
///
/// The child is polled until it exits; between polls the [`Context`] is
/// checked and the child is killed as soon as it is cancelled or expired.
///
/// Children lead their own process group so cancellation also reaches any
/// helpers they forked. Elevation wrappers stay in our group because they
/// may prompt on the terminal; they relay the SIGTERM sent on cancellation
/// to the command they run.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    poll_interval: Duration,
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl SystemExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn_and_wait(
        &self,
        ctx: &Context,
        input: Option<&[u8]>,
        cmd: &str,
        args: &[String],
    ) -> Result<CommandResult, ExecutionError> {
        let cmd_debug = render_command(cmd, args);
        ctx.check(&cmd_debug)?;

        let own_group = !is_elevation_wrapper(cmd);
        let mut command = Command::new(cmd);
        command
            .args(args)
            .env("LC_ALL", "C")
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if own_group {
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|e| ExecutionError::Spawn {
                command: cmd_debug.clone(),
                reason: e.to_string(),
            })?;

        let stdin_thread = match input {
            Some(input) => {
                let mut stdin = child.stdin.take().ok_or_else(|| ExecutionError::Io {
                    command: cmd_debug.clone(),
                    reason: "Failed to capture stdin".to_string(),
                })?;
                let input = input.to_vec();
                Some(thread::spawn(move || {
                    // The pipe closes when `stdin` drops at the end of the thread.
                    let _ = stdin.write_all(&input);
                }))
            }
            None => None,
        };

        let stdout = child.stdout.take().ok_or_else(|| ExecutionError::Io {
            command: cmd_debug.clone(),
            reason: "Failed to capture stdout".to_string(),
        })?;
        let stderr = child.stderr.take().ok_or_else(|| ExecutionError::Io {
            command: cmd_debug.clone(),
            reason: "Failed to capture stderr".to_string(),
        })?;

        let stdout_thread = read_to_end_in_thread(stdout);
        let stderr_thread = read_to_end_in_thread(stderr);

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if let Err(e) = ctx.check(&cmd_debug) {
                        terminate(&mut child, own_group);
                        let drain_deadline = Instant::now() + DRAIN_GRACE;
                        join_until(stdout_thread, drain_deadline);
                        join_until(stderr_thread, drain_deadline);
                        if let Some(t) = stdin_thread {
                            join_until(t, drain_deadline);
                        }
                        return Err(e);
                    }
                    thread::sleep(self.poll_interval);
                }
                Err(e) => {
                    terminate(&mut child, own_group);
                    return Err(ExecutionError::Io {
                        command: cmd_debug,
                        reason: e.to_string(),
                    });
                }
            }
        };

        if let Some(t) = stdin_thread {
            let _ = t.join();
        }
        let stdout = stdout_thread.join().unwrap_or_default();
        let stderr = stderr_thread.join().unwrap_or_default();

        Ok(CommandResult {
            exit_code: status.code().unwrap_or(-1),
            stdout,
            stderr,
        })
    }
}

impl Executor for SystemExecutor {
    fn execute(
        &self,
        ctx: &Context,
        cmd: &str,
        args: &[String],
    ) -> Result<CommandResult, ExecutionError> {
        self.spawn_and_wait(ctx, None, cmd, args)
    }

    fn execute_with_input(
        &self,
        ctx: &Context,
        input: &[u8],
        cmd: &str,
        args: &[String],
    ) -> Result<CommandResult, ExecutionError> {
        self.spawn_and_wait(ctx, Some(input), cmd, args)
    }
}

fn read_to_end_in_thread<R: Read + Send + 'static>(reader: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = std::io::BufReader::new(reader).read_to_end(&mut buf);
        buf
    })
}

fn is_elevation_wrapper(cmd: &str) -> bool {
    ElevationMethod::ALL.iter().any(|m| m.binary() == cmd)
}

/// SIGTERM the child (and its group when it leads one), SIGKILL whatever is
/// left once the grace period runs out, then reap.
fn terminate(child: &mut Child, own_group: bool) {
    let pid = Pid::from_raw(child.id() as i32);
    let signal = |sig| {
        let _ = if own_group { killpg(pid, sig) } else { kill(pid, sig) };
    };
    signal(Signal::SIGTERM);

    let deadline = Instant::now() + TERMINATE_GRACE;
    let mut reaped = false;
    while Instant::now() < deadline {
        if let Ok(Some(_)) = child.try_wait() {
            reaped = true;
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }

    // Helpers may outlive the leader while still holding the pipes. A reaped
    // pid may be reused, so only the group is signalled after that.
    if own_group || !reaped {
        signal(Signal::SIGKILL);
    }
    if !reaped {
        let _ = child.kill();
        let _ = child.wait();
    }
}

/// Join `handle` if it finishes before `deadline`; otherwise leave it
/// detached. A reader only outlives the deadline when a process we could
/// not signal still holds the pipe.
fn join_until<T>(handle: JoinHandle<T>, deadline: Instant) {
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    let _ = handle.join();
}

#[cfg(test)]
mod tests;
