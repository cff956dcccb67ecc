//! An interactive command-line shell with persistent history.
//!
//! The shell reads one line at a time, dispatches it to a small set of
//! built-in commands (echo, history listing, environment lookup, a
//! boot-sector check, a cron-spool snapshot, a process memory dump) and
//! forwards everything else verbatim to the system command interpreter.
//! The command history survives across sessions in a plain text file.
//!
//! The main entry point is [`Interpreter`], which owns the session state and
//! executes commands through an ordered set of pluggable factories. The
//! public modules [`command`], [`env`] and [`history`] expose the traits and
//! types for implementing your own commands and the session state they act on.

mod builtin;
pub mod command;
mod cron;
mod device;
pub mod env;
mod external;
pub mod history;
mod interpreter;
mod memdump;
pub mod signal;

pub use interpreter::{Interpreter, default_factories};
