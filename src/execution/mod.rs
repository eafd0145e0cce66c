//! # Command Execution
//!
//! Everything that touches a child process lives here. Backend managers never
//! spawn processes themselves; they hold a [`Runner`] and describe commands as
//! a program name plus an argument vector.
//!
//! - [`Context`]: cancellation flag + optional deadline, shared by clones
//! - [`Executor`]: runs one command and captures exit code, stdout and stderr
//! - [`Elevator`]: rewrites a command so it runs as root
//! - [`Runner`]: the executor/elevator pair a backend is constructed with
//!
//! [`system::SystemExecutor`] and [`elevation::SystemElevator`] are the real
//! implementations; [`recording::RecordingExecutor`] replays scripted output.

pub mod elevation;
pub mod recording;
pub mod system;

use crate::error::{ExecutionError, Result};
use crate::ui;
use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

pub use elevation::{ElevationMethod, SystemElevator};
pub use recording::{Invocation, RecordingExecutor};
pub use system::SystemExecutor;

/// Cancellation and deadline for one logical call.
///
/// Clones share the cancellation flag, so cancelling any clone (for example
/// from a Ctrl-C handler) aborts every command started with it.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
    timeout: Option<Duration>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a context that also expires after `timeout`.
    ///
    /// The earlier of the existing and the new deadline wins.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        let (deadline, timeout) = match (self.deadline, self.timeout) {
            (Some(existing), Some(existing_timeout)) if existing <= deadline => {
                (existing, existing_timeout)
            }
            _ => (deadline, timeout),
        };

        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline: Some(deadline),
            timeout: Some(timeout),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Error out if the context is cancelled or past its deadline.
    pub fn check(&self, command: &str) -> std::result::Result<(), ExecutionError> {
        if self.is_cancelled() {
            return Err(ExecutionError::Cancelled);
        }
        if self.is_expired() {
            return Err(ExecutionError::TimedOut {
                command: command.to_string(),
                seconds: self.timeout.map(|t| t.as_secs()).unwrap_or(0),
            });
        }
        Ok(())
    }
}

/// Exit code and captured output of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandResult {
    pub fn new(exit_code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// stderr followed by stdout, for error classification.
    pub fn combined_text(&self) -> String {
        let stderr = self.stderr_text();
        let stdout = self.stdout_text();
        match (stderr.trim().is_empty(), stdout.trim().is_empty()) {
            (true, _) => stdout.into_owned(),
            (false, true) => stderr.into_owned(),
            (false, false) => format!("{}\n{}", stderr.trim_end(), stdout),
        }
    }
}

/// Runs a command and captures its result.
pub trait Executor: Send + Sync {
    fn execute(
        &self,
        ctx: &Context,
        cmd: &str,
        args: &[String],
    ) -> std::result::Result<CommandResult, ExecutionError>;

    /// Same as [`Executor::execute`], with `input` piped to the child's stdin.
    fn execute_with_input(
        &self,
        ctx: &Context,
        input: &[u8],
        cmd: &str,
        args: &[String],
    ) -> std::result::Result<CommandResult, ExecutionError>;
}

/// Decides how to run a command as root.
pub trait Elevator: Send + Sync {
    /// Returns the command and arguments to run, prefixed with the elevation
    /// tool when needed, or unchanged when already privileged.
    fn elevate(&self, cmd: &str, args: &[String]) -> (String, Vec<String>);

    /// Whether root execution is possible at all.
    fn can_elevate(&self) -> bool;
}

/// The executor and elevator a backend manager is built with.
#[derive(Clone)]
pub struct Runner {
    executor: Arc<dyn Executor>,
    elevator: Arc<dyn Elevator>,
}

impl Runner {
    pub fn new(executor: Arc<dyn Executor>, elevator: Arc<dyn Elevator>) -> Self {
        Self { executor, elevator }
    }

    /// Read-only query, never elevated.
    pub fn run(&self, ctx: &Context, cmd: &str, args: &[String]) -> Result<CommandResult> {
        ui::debug(&format!("$ {}", render_command(cmd, args)));
        Ok(self.executor.execute(ctx, cmd, args)?)
    }

    pub fn run_elevated(&self, ctx: &Context, cmd: &str, args: &[String]) -> Result<CommandResult> {
        let (cmd, args) = self.elevator.elevate(cmd, args);
        ui::debug(&format!("# {}", render_command(&cmd, &args)));
        Ok(self.executor.execute(ctx, &cmd, &args)?)
    }

    /// Elevated write-through-pipe, used for repository files.
    pub fn run_elevated_with_input(
        &self,
        ctx: &Context,
        input: &[u8],
        cmd: &str,
        args: &[String],
    ) -> Result<CommandResult> {
        let (cmd, args) = self.elevator.elevate(cmd, args);
        ui::debug(&format!(
            "# {} <<< ({} bytes)",
            render_command(&cmd, &args),
            input.len()
        ));
        Ok(self.executor.execute_with_input(ctx, input, &cmd, &args)?)
    }

    pub fn can_elevate(&self) -> bool {
        self.elevator.can_elevate()
    }
}

/// Shell-quoted rendering of a command line, for logs and error messages.
pub fn render_command(cmd: &str, args: &[String]) -> String {
    let parts = std::iter::once(cmd).chain(args.iter().map(String::as_str));
    shlex::try_join(parts).unwrap_or_else(|_| {
        let mut line = cmd.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    })
}
