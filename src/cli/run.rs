//! Main entry point for the `import-cost` CLI.
//!
//! Dispatches to the appropriate command handler based on the parsed
//! arguments and returns the process exit status.

use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{cost::cost, init::init},
    exit_status::ExitStatus,
};

pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Cost(cmd)) => cost(cmd),
        Some(Command::Init) => init(),
        Some(Command::Serve) => {
            // Serve is handled in main.rs before calling run().
            anyhow::bail!("Serve command should be handled before run()")
        }
        None => anyhow::bail!("No command provided. Use --help to see available commands."),
    }
}
