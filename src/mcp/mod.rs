//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes the `import_cost` pipeline to AI coding assistants over stdio,
//! using the same orchestrator and config loading as the `cost` CLI command.
//!
//! ## Module Structure
//!
//! - `server`: main MCP server implementation and its single `import_cost` tool
//! - `types`: request/response DTOs for that tool

mod server;
pub mod types;

pub use server::{ImportCostMcpServer, run_server};
