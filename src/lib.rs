//! import-cost - per-import production bundle size analysis for JS/TS projects
//!
//! Computes, for a single JS/TS/Vue/Svelte source file, the minified and
//! gzipped production-bundle size each of its imports would add, by
//! resolving each import against `node_modules`, bundling a synthetic entry
//! module in isolation with peer/external dependencies marked external, and
//! measuring the result.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands)
//! - `config`: Configuration file loading and parsing
//! - `core`: the import-cost pipeline (extract, resolve, cache, size, orchestrate)
//! - `mcp`: Model Context Protocol server implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod mcp;
