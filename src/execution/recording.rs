use super::{CommandResult, Context, Executor, render_command};
use crate::error::ExecutionError;
use std::sync::{Mutex, MutexGuard};

/// One recorded call to a [`RecordingExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
    pub input: Option<Vec<u8>>,
}

impl Invocation {
    /// Command and arguments joined by single spaces.
    pub fn line(&self) -> String {
        let mut line = self.command.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    pub fn input_text(&self) -> Option<String> {
        self.input
            .as_ref()
            .map(|i| String::from_utf8_lossy(i).into_owned())
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Exit(CommandResult),
    SpawnFailure,
}

/// Executor that replays scripted results and records every call.
///
/// Replies are keyed by a substring of the invocation line; the first
/// registered match wins. Unmatched calls succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    invocations: Mutex<Vec<Invocation>>,
    replies: Mutex<Vec<(String, Reply)>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, pattern: &str, result: CommandResult) -> &Self {
        lock(&self.replies).push((pattern.to_string(), Reply::Exit(result)));
        self
    }

    pub fn respond_ok(&self, pattern: &str, stdout: &str) -> &Self {
        self.respond(pattern, CommandResult::new(0, stdout, ""))
    }

    pub fn respond_exit(&self, pattern: &str, exit_code: i32, stdout: &str, stderr: &str) -> &Self {
        self.respond(pattern, CommandResult::new(exit_code, stdout, stderr))
    }

    /// Make matching calls fail as if the binary could not be started.
    pub fn fail_spawn(&self, pattern: &str) -> &Self {
        lock(&self.replies).push((pattern.to_string(), Reply::SpawnFailure));
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        lock(&self.invocations).clone()
    }

    pub fn lines(&self) -> Vec<String> {
        lock(&self.invocations).iter().map(Invocation::line).collect()
    }

    pub fn count(&self) -> usize {
        lock(&self.invocations).len()
    }

    fn record(
        &self,
        ctx: &Context,
        input: Option<&[u8]>,
        cmd: &str,
        args: &[String],
    ) -> Result<CommandResult, ExecutionError> {
        ctx.check(&render_command(cmd, args))?;

        let invocation = Invocation {
            command: cmd.to_string(),
            args: args.to_vec(),
            input: input.map(<[u8]>::to_vec),
        };
        let line = invocation.line();
        lock(&self.invocations).push(invocation);

        let reply = lock(&self.replies)
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Exit(result)) => Ok(result),
            Some(Reply::SpawnFailure) => Err(ExecutionError::Spawn {
                command: line,
                reason: "No such file or directory (os error 2)".to_string(),
            }),
            None => Ok(CommandResult::default()),
        }
    }
}

impl Executor for RecordingExecutor {
    fn execute(
        &self,
        ctx: &Context,
        cmd: &str,
        args: &[String],
    ) -> Result<CommandResult, ExecutionError> {
        self.record(ctx, None, cmd, args)
    }

    fn execute_with_input(
        &self,
        ctx: &Context,
        input: &[u8],
        cmd: &str,
        args: &[String],
    ) -> Result<CommandResult, ExecutionError> {
        self.record(ctx, Some(input), cmd, args)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
