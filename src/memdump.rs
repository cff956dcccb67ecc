use crate::builtin::BuiltinCommand;
use crate::command::ExitCode;
use crate::env::Environment;
use crate::history::HistoryLog;
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// Location of the dump artifact for `pid`.
pub fn dump_path(pid: i32) -> PathBuf {
    PathBuf::from(format!("/tmp/mem_dump_{}", pid))
}

/// Best-effort PID parse; anything non-numeric becomes 0.
pub fn parse_pid(text: &str) -> i32 {
    text.trim().parse().unwrap_or(0)
}

/// Dump a process image via an external debugger. Matches `\mem <pid>`.
///
/// The PID is not validated beforehand; a dead or inaccessible process
/// surfaces as a non-zero exit from the debugger.
pub(crate) struct MemoryDump {
    pid: i32,
}

impl BuiltinCommand for MemoryDump {
    fn try_parse(line: &str) -> Option<Self> {
        line.strip_prefix("\\mem ").map(|rest| MemoryDump {
            pid: parse_pid(rest),
        })
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _env: &mut Environment,
        _history: &HistoryLog,
    ) -> Result<ExitCode> {
        let dump = dump_path(self.pid);
        let status = Command::new("gdb")
            .arg("--batch")
            .args(["-p", &self.pid.to_string()])
            .args(["-ex", &format!("gcore {}", dump.display())])
            .args(["-ex", "detach"])
            .args(["-ex", "quit"])
            .status();
        match status {
            Ok(s) if s.success() => {
                writeln!(
                    stdout,
                    "memory dump of process {} written to {}",
                    self.pid,
                    dump.display()
                )?;
                Ok(0)
            }
            _ => {
                writeln!(stdout, "failed to create memory dump of process {}", self.pid)?;
                Ok(1)
            }
        }
    }
}
