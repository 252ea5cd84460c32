//! CLI argument definitions using clap.
//!
//! This module defines the command-line interface structure for all
//! `import-cost` commands. It uses clap's derive API for declarative
//! argument parsing.
//!
//! ## Commands
//!
//! - `cost`: Run one source file through the pipeline and print a table
//! - `init`: Write a default `.import-cost.json` configuration file
//! - `serve`: Start the MCP server for AI coding agents

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

use crate::core::Language;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Cost(cmd)) => cmd.common.verbose,
            Some(Command::Init) | Some(Command::Serve) | None => false,
        }
    }
}

/// Source dialect, as selected on the command line. Mirrors `core::Language`
/// but gives clap a type with no `Unknown` variant to offer as a flag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    Javascript,
    Typescript,
    Vue,
    Svelte,
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::Javascript => Language::Javascript,
            LanguageArg::Typescript => Language::Typescript,
            LanguageArg::Vue => Language::Vue,
            LanguageArg::Svelte => Language::Svelte,
        }
    }
}

/// Common arguments shared by commands that drive the orchestrator.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Source dialect. Inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    pub language: Option<LanguageArg>,

    /// Parallelize per-import sizer invocations (overrides the config file).
    #[arg(long)]
    pub concurrent: bool,

    /// Serialize per-import sizer invocations (overrides the config file).
    #[arg(long, conflicts_with = "concurrent")]
    pub no_concurrent: bool,

    /// Per-sizer deadline in milliseconds, or `infinity` (overrides the config file).
    #[arg(long)]
    pub max_call_time: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct CostCommand {
    /// Path to the source file to analyze.
    pub file: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the production-bundle weight of each import in a file
    Cost(CostCommand),
    /// Write a default `.import-cost.json` configuration file
    Init,
    /// Start the MCP server for AI coding agents
    Serve,
}
