use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Result as IoResult, Write};
use std::path::{Path, PathBuf};

/// Default location of the persistent history file.
pub const HISTORY_FILE: &str = "history_log.txt";

/// Upper bound on recorded entries per session.
pub const MAX_HISTORY: usize = 100;

/// Bounded, append-only log of accepted command lines.
///
/// Insertion order is chronological order, and the order persisted to disk
/// equals the in-memory order. Once the capacity is reached, further pushes
/// record nothing; the session itself keeps running.
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: Vec<String>,
}

impl HistoryLog {
    /// An empty log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record one command line. Returns `false` once the log is full.
    pub fn push(&mut self, entry: impl Into<String>) -> bool {
        if self.entries.len() >= MAX_HISTORY {
            return false;
        }
        self.entries.push(entry.into());
        true
    }

    /// Entries in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load/save pair for the persistent history file.
///
/// The file format is plain text, one command per line, no escaping. The
/// store is consulted exactly twice per session: once at startup and once at
/// shutdown, so a crash loses whatever was entered since the last save.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted log, preserving file order.
    ///
    /// A missing file is an empty history, not an error. Lines beyond the
    /// capacity bound are dropped silently.
    pub fn load(&self) -> IoResult<HistoryLog> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HistoryLog::new()),
            Err(e) => return Err(e),
        };
        let mut log = HistoryLog::new();
        for line in BufReader::new(file).lines() {
            if !log.push(line?) {
                break;
            }
        }
        Ok(log)
    }

    /// Rewrite the persisted log, one entry per line, in order.
    pub fn save(&self, log: &HistoryLog) -> IoResult<()> {
        let mut file = File::create(&self.path)?;
        for entry in log.iter() {
            writeln!(file, "{}", entry)?;
        }
        Ok(())
    }
}
