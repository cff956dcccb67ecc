use crate::env::Environment;
use crate::history::HistoryLog;
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Object-safe trait for any command the shell can execute.
///
/// This is implemented by built-ins via a blanket impl and by the
/// system-interpreter fallback.
pub trait ExecutableCommand {
    /// Executes the command against the session output and state.
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        env: &mut Environment,
        history: &HistoryLog,
    ) -> Result<ExitCode>;
}

/// Factory that tries to create a command from one raw input line.
///
/// Returns `None` when the factory doesn't recognize the `line`. The
/// interpreter queries its factories in order and the first one to create a
/// command wins, so a factory's position in that list is its priority.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided line.
    fn try_create(&self, line: &str) -> Option<Box<dyn ExecutableCommand>>;
}
