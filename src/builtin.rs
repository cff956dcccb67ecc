use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::history::HistoryLog;
use crate::interpreter::Factory;
use anyhow::Result;
use std::io::Write;

/// Built-in commands known to the shell at compile time.
///
/// A builtin recognizes itself from the raw input line and executes directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized {
    /// Recognize this command in `line`, capturing its argument if any.
    ///
    /// Matching is by literal prefix or equality on the raw line; the
    /// interpreter's factory order decides which builtin sees the line first.
    fn try_parse(line: &str) -> Option<Self>;

    /// Executes the command using the provided output and session state.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(
        self,
        stdout: &mut dyn Write,
        env: &mut Environment,
        history: &HistoryLog,
    ) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        env: &mut Environment,
        history: &HistoryLog,
    ) -> Result<ExitCode> {
        match T::execute(*self, stdout, env, history) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(stdout, "{}", e)?;
                Ok(1)
            }
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(&self, line: &str) -> Option<Box<dyn ExecutableCommand>> {
        T::try_parse(line).map(|cmd| Box::new(cmd) as Box<dyn ExecutableCommand>)
    }
}

/// Leave the shell. Matches `exit` and `\q`.
///
/// Only raises the exit flag; the loop's single shutdown path persists the
/// history and prints the farewell, so EOF behaves identically.
pub(crate) struct Exit;

impl BuiltinCommand for Exit {
    fn try_parse(line: &str) -> Option<Self> {
        (line == "exit" || line == "\\q").then_some(Exit)
    }

    fn execute(
        self,
        _stdout: &mut dyn Write,
        env: &mut Environment,
        _history: &HistoryLog,
    ) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}

/// Print the rest of the line verbatim, with a trailing newline.
///
/// No variable or escape expansion; interior whitespace survives as typed.
pub(crate) struct Echo {
    text: String,
}

impl BuiltinCommand for Echo {
    fn try_parse(line: &str) -> Option<Self> {
        line.strip_prefix("echo ").map(|rest| Echo {
            text: rest.to_string(),
        })
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _env: &mut Environment,
        _history: &HistoryLog,
    ) -> Result<ExitCode> {
        writeln!(stdout, "{}", self.text)?;
        Ok(0)
    }
}

/// List the session history in order, 1-indexed.
pub(crate) struct History;

impl BuiltinCommand for History {
    fn try_parse(line: &str) -> Option<Self> {
        (line == "history").then_some(History)
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _env: &mut Environment,
        history: &HistoryLog,
    ) -> Result<ExitCode> {
        for (index, entry) in history.iter().enumerate() {
            writeln!(stdout, "{}: {}", index + 1, entry)?;
        }
        Ok(0)
    }
}

/// Look up one environment variable given as `$NAME`. Matches `\e $NAME`.
///
/// The first character of the argument is skipped unconditionally, assumed to
/// be the `$` sigil; the reference is echoed back as typed. An argument
/// shorter than two characters degrades to the empty name, which is never set.
pub(crate) struct EnvLookup {
    reference: String,
}

impl BuiltinCommand for EnvLookup {
    fn try_parse(line: &str) -> Option<Self> {
        line.strip_prefix("\\e ").map(|rest| EnvLookup {
            reference: rest.to_string(),
        })
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        env: &mut Environment,
        _history: &HistoryLog,
    ) -> Result<ExitCode> {
        let name = self.reference.get(1..).unwrap_or("");
        match env.get_var(name) {
            Some(value) => writeln!(stdout, "{}={}", self.reference, value)?,
            None => writeln!(
                stdout,
                "environment variable {} not found",
                self.reference
            )?,
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn empty_env() -> Environment {
        Environment {
            vars: HashMap::new(),
            should_exit: false,
        }
    }

    #[test]
    fn test_exit_matches_both_spellings_and_raises_flag() {
        for line in ["exit", "\\q"] {
            let cmd = Exit::try_parse(line).expect("should match");
            let mut env = empty_env();
            let mut out = Vec::new();
            let code = cmd.execute(&mut out, &mut env, &HistoryLog::new()).unwrap();
            assert_eq!(code, 0);
            assert!(env.should_exit);
            assert!(out.is_empty());
        }
        assert!(Exit::try_parse("exit now").is_none());
        assert!(Exit::try_parse("\\quit").is_none());
    }

    #[test]
    fn test_echo_preserves_interior_whitespace() {
        let cmd = Echo::try_parse("echo a  b\tc").expect("should match");
        let mut out = Vec::new();
        let code = cmd
            .execute(&mut out, &mut empty_env(), &HistoryLog::new())
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "a  b\tc\n");
    }

    #[test]
    fn test_echo_requires_the_space() {
        assert!(Echo::try_parse("echo").is_none());
        assert!(Echo::try_parse("echoed").is_none());
    }

    #[test]
    fn test_history_lists_entries_one_indexed() {
        let mut log = HistoryLog::new();
        log.push("echo hi");
        log.push("\\cron");

        let cmd = History::try_parse("history").expect("should match");
        let mut out = Vec::new();
        let code = cmd.execute(&mut out, &mut empty_env(), &log).unwrap();
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "1: echo hi\n2: \\cron\n");
    }

    #[test]
    fn test_env_lookup_found_prints_reference_as_typed() {
        let mut env = empty_env();
        env.set_var("MY_VAR", "42");

        let cmd = EnvLookup::try_parse("\\e $MY_VAR").expect("should match");
        let mut out = Vec::new();
        let code = cmd.execute(&mut out, &mut env, &HistoryLog::new()).unwrap();
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "$MY_VAR=42\n");
    }

    #[test]
    fn test_env_lookup_missing_prints_not_found() {
        let cmd = EnvLookup::try_parse("\\e $NO_SUCH_VAR_98765").expect("should match");
        let mut out = Vec::new();
        let code = cmd
            .execute(&mut out, &mut empty_env(), &HistoryLog::new())
            .unwrap();
        assert_eq!(code, 0);
        let s = String::from_utf8(out).unwrap();
        assert_eq!(s, "environment variable $NO_SUCH_VAR_98765 not found\n");
    }

    #[test]
    fn test_env_lookup_sigil_is_skipped_unconditionally() {
        // No `$` in sight: the first character still gets dropped.
        let mut env = empty_env();
        env.set_var("ATH", "oops");

        let cmd = EnvLookup::try_parse("\\e PATH").expect("should match");
        let mut out = Vec::new();
        cmd.execute(&mut out, &mut env, &HistoryLog::new()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "PATH=oops\n");
    }

    #[test]
    fn test_env_lookup_degenerate_argument_is_not_found() {
        let cmd = EnvLookup::try_parse("\\e $").expect("should match");
        let mut out = Vec::new();
        let code = cmd
            .execute(&mut out, &mut empty_env(), &HistoryLog::new())
            .unwrap();
        assert_eq!(code, 0);
        assert!(String::from_utf8(out).unwrap().contains("not found"));
    }
}
