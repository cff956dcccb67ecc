use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::history::HistoryLog;
use crate::interpreter::Factory;
use anyhow::Result;
use std::io::Write;
use std::process::{Command, ExitStatus};

/// Interpreter used for everything the shell does not recognize itself.
const SYSTEM_SHELL: &str = "/bin/sh";

/// Command that is not a builtin.
///
/// The raw line is handed to the system command interpreter unparsed; the
/// child inherits the terminal and the shell blocks until it finishes.
pub struct ShellOut {
    line: String,
}

impl CommandFactory for Factory<ShellOut> {
    /// Always matches, so this factory terminates the dispatch chain.
    fn try_create(&self, line: &str) -> Option<Box<dyn ExecutableCommand>> {
        Some(Box::new(ShellOut {
            line: line.to_string(),
        }))
    }
}

impl ExecutableCommand for ShellOut {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        env: &mut Environment,
        _history: &HistoryLog,
    ) -> Result<ExitCode> {
        let status = Command::new(SYSTEM_SHELL)
            .arg("-c")
            .arg(&self.line)
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .status();
        let status = match status {
            Ok(s) => s,
            Err(e) => {
                writeln!(stdout, "cannot run {}: {}", SYSTEM_SHELL, e)?;
                return Ok(127);
            }
        };
        match status.code() {
            Some(x) => Ok(x),
            None => Ok(terminated_by_signal(status)),
        }
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}
