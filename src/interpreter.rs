use crate::builtin::{Echo, EnvLookup, Exit, History};
use crate::command::{CommandFactory, ExitCode};
use crate::cron::CronSnapshot;
use crate::device::BootCheck;
use crate::env::Environment;
use crate::external::ShellOut;
use crate::history::{HISTORY_FILE, HistoryLog, HistoryStore};
use crate::memdump::MemoryDump;
use crate::signal;
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use std::path::Path;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate — builtins and ShellOut.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// The shell's dispatch loop.
///
/// The interpreter owns the session state (an [`Environment`], the bounded
/// [`HistoryLog`] and its [`HistoryStore`]) and an ordered list of
/// [`CommandFactory`] objects queried to recognize each input line. The
/// first factory to create a command wins, so the list order is the command
/// priority order; see [`default_factories`] for the stock arrangement.
pub struct Interpreter {
    env: Environment,
    history: HistoryLog,
    store: HistoryStore,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create an interpreter with a custom set of command factories.
    ///
    /// The log persisted at `store` is loaded immediately. A missing file is
    /// an empty history; any other read failure is reported and also yields
    /// an empty history, since losing recall should not block the session.
    pub fn new(store: HistoryStore, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        let history = match store.load() {
            Ok(log) => log,
            Err(e) => {
                println!("cannot load history from {}: {}", store.path().display(), e);
                HistoryLog::new()
            }
        };
        Self {
            env: Environment::new(),
            history,
            store,
            commands,
        }
    }

    /// The full command set against the history file at `path`.
    pub fn with_history_file(path: impl AsRef<Path>) -> Self {
        Self::new(HistoryStore::new(path.as_ref()), default_factories())
    }

    /// True once `exit` or `\q` has been dispatched.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Record `line` and dispatch it, writing command output to `out`.
    ///
    /// Recording happens before dispatch. The history listing itself is the
    /// one line that is not recorded: it reads the log, it does not belong
    /// in it.
    pub fn handle_line(&mut self, line: &str, out: &mut dyn Write) -> Result<ExitCode> {
        if line != "history" {
            self.history.push(line);
        }
        self.dispatch(line, out)
    }

    /// Route one non-empty line to exactly one command.
    ///
    /// Returns the command's exit code, or an error only when no factory
    /// recognized the line — impossible with the stock factory set, whose
    /// last entry matches everything.
    pub fn dispatch(&mut self, line: &str, out: &mut dyn Write) -> Result<ExitCode> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(line) {
                return cmd.execute(out, &mut self.env, &self.history);
            }
        }
        Err(anyhow::anyhow!("command not found: {}", line))
    }

    /// Persist the session history and say goodbye.
    ///
    /// A failing save is a diagnostic, not an error; there is nothing useful
    /// to do about it this late.
    pub fn shutdown(&mut self, out: &mut dyn Write) -> Result<()> {
        if let Err(e) = self.store.save(&self.history) {
            writeln!(
                out,
                "cannot save history to {}: {}",
                self.store.path().display(),
                e
            )?;
        }
        writeln!(out, "Goodbye!")?;
        Ok(())
    }

    /// The interactive Read-Eval-Print Loop.
    ///
    /// Ends on `exit`/`\q` or end of input, both through the same shutdown
    /// path; Ctrl-C only abandons the current line. A SIGHUP received since
    /// the last iteration is acknowledged before the next prompt. Empty
    /// lines are discarded before they reach the dispatcher.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        for entry in self.history.iter() {
            let _ = rl.add_history_entry(entry);
        }

        loop {
            if signal::take_reload_request() {
                println!("Configuration reloaded.");
            }
            match rl.readline("> ") {
                Ok(line) => {
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line.as_str());
                    let mut stdout = std::io::stdout();
                    if let Err(e) = self.handle_line(&line, &mut stdout) {
                        println!("{}", e);
                    }
                    if self.env.should_exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }

        let mut stdout = std::io::stdout();
        self.shutdown(&mut stdout)
    }
}

impl Default for Interpreter {
    /// Interpreter with the full command set and the default history file.
    fn default() -> Self {
        Self::with_history_file(HISTORY_FILE)
    }
}

/// The built-in command set in its documented priority order, with the
/// system-interpreter fallback last:
/// `exit`/`\q`, `echo `, `history`, `\e `, `\l `, `\cron`, `\mem `,
/// then everything else.
pub fn default_factories() -> Vec<Box<dyn CommandFactory>> {
    vec![
        Box::new(Factory::<Exit>::default()),
        Box::new(Factory::<Echo>::default()),
        Box::new(Factory::<History>::default()),
        Box::new(Factory::<EnvLookup>::default()),
        Box::new(Factory::<BootCheck>::default()),
        Box::new(Factory::<CronSnapshot>::default()),
        Box::new(Factory::<MemoryDump>::default()),
        Box::new(Factory::<ShellOut>::default()),
    ]
}
