//! `import-cost` CLI application entry point.
//!
//! Routes to either the CLI commands or the MCP server based on the
//! command-line arguments.

use std::process::ExitCode;

use clap::Parser;
use import_cost::cli::{Arguments, Command, ExitStatus};

fn main() -> ExitCode {
    let args = Arguments::parse();

    if matches!(args.command, Some(Command::Serve)) {
        if let Err(err) = import_cost::mcp::run_server() {
            eprintln!("Error: {err}");
            return ExitStatus::Error.into();
        }
        return ExitStatus::Success.into();
    }

    match import_cost::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitStatus::Error.into()
        }
    }
}
