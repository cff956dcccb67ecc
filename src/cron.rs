use crate::builtin::BuiltinCommand;
use crate::command::ExitCode;
use crate::env::Environment;
use crate::history::HistoryLog;
use anyhow::Result;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

/// Fixed location of the snapshot file.
pub const SNAPSHOT_PATH: &str = "/tmp/cron_vfs";

/// Scheduled-task spool directory that gets listed.
pub const SPOOL_DIR: &str = "/var/spool/cron";

/// Capture a listing of `spool` into the file at `snapshot`.
///
/// The snapshot is truncated first, so each call fully replaces the previous
/// one. Failures of the listing itself are suppressed; a missing or
/// unreadable spool leaves an empty snapshot behind.
pub fn write_snapshot(snapshot: &Path, spool: &Path) -> io::Result<()> {
    let file = File::create(snapshot)?;
    let _ = Command::new("ls")
        .arg(spool)
        .stdout(Stdio::from(file))
        .stderr(Stdio::null())
        .status();
    Ok(())
}

/// Snapshot the cron spool directory. Matches `\cron`.
pub(crate) struct CronSnapshot;

impl BuiltinCommand for CronSnapshot {
    fn try_parse(line: &str) -> Option<Self> {
        (line == "\\cron").then_some(CronSnapshot)
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _env: &mut Environment,
        _history: &HistoryLog,
    ) -> Result<ExitCode> {
        if let Err(e) = write_snapshot(Path::new(SNAPSHOT_PATH), Path::new(SPOOL_DIR)) {
            writeln!(stdout, "cannot create snapshot {}: {}", SNAPSHOT_PATH, e)?;
            return Ok(1);
        }
        writeln!(stdout, "cron task snapshot written to {}", SNAPSHOT_PATH)?;
        Ok(0)
    }
}
