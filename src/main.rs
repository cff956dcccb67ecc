use anyhow::Result;
use argh::FromArgs;
use ops_shell::history::HISTORY_FILE;
use ops_shell::{Interpreter, signal};
use std::path::PathBuf;

#[derive(FromArgs)]
/// Interactive command shell with persistent history and a few
/// system-inspection builtins.
struct Args {
    /// where the command history is persisted between sessions
    #[argh(option, default = "PathBuf::from(HISTORY_FILE)")]
    history_file: PathBuf,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    if let Err(e) = signal::install_sighup_handler() {
        println!("cannot install SIGHUP handler: {}", e);
    }

    let mut shell = Interpreter::with_history_file(&args.history_file);
    println!("Welcome to ops_shell. Use 'exit' or '\\q' to quit.");
    shell.repl()
}
