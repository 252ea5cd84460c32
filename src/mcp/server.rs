//! MCP server exposing the `import_cost` pipeline to AI coding agents.

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::config::{self, Config, MaxCallTime};
use crate::core::{Engine, Event, Language, import_cost};

use super::types::{ImportCostParams, ImportCostResult};

#[derive(Clone)]
pub struct ImportCostMcpServer {
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ImportCostMcpServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    /// Compute the production-bundle size of every external import in a
    /// JS/TS/Vue/Svelte file.
    #[tool(
        description = "Compute per-import production-bundle weight (raw and gzip bytes) for every externally resolvable import in a JavaScript, TypeScript, Vue or Svelte source file."
    )]
    async fn import_cost(
        &self,
        params: Parameters<ImportCostParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let file_name = std::path::Path::new(&params.file_path)
            .canonicalize()
            .map_err(|e| {
                McpError::invalid_params(format!("cannot resolve {}: {e}", params.file_path), None)
            })?;

        let source = match params.source {
            Some(source) => source,
            None => fs::read_to_string(&file_name).map_err(|e| {
                McpError::invalid_params(format!("cannot read {}: {e}", file_name.display()), None)
            })?,
        };

        let language = match params.language.as_deref() {
            Some(raw) => parse_language(raw)
                .ok_or_else(|| McpError::invalid_params(format!("unknown language '{raw}'"), None))?,
            None => infer_language(&file_name),
        };

        let config_dir = file_name
            .parent()
            .ok_or_else(|| McpError::invalid_params("file has no parent directory", None))?;
        let mut config = config::load_config(config_dir)
            .map_err(|e| McpError::internal_error(format!("config load failed: {e}"), None))?
            .config;
        apply_overrides(&mut config, &params).map_err(|e| {
            McpError::invalid_params(format!("invalid override: {e}"), None)
        })?;
        config
            .validate()
            .map_err(|e| McpError::invalid_params(format!("invalid config: {e}"), None))?;

        let engine = Arc::new(Engine::new(&config));
        let events = import_cost(engine, file_name, source, language, config)
            .collect()
            .await;

        let entries = match events.into_iter().last() {
            Some(Event::Done(entries)) => entries,
            Some(Event::Error(err)) => {
                return Err(McpError::internal_error(format!("{err}"), None));
            }
            _ => {
                return Err(McpError::internal_error(
                    "orchestrator produced no terminal event",
                    None,
                ));
            }
        };

        let result = ImportCostResult::from_entries(entries);
        let json_str = serde_json::to_string_pretty(&result).map_err(|e| {
            McpError::internal_error(format!("JSON serialization failed: {e}"), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(json_str)]))
    }
}

fn apply_overrides(config: &mut Config, params: &ImportCostParams) -> Result<(), String> {
    if let Some(concurrent) = params.concurrent {
        config.concurrent = concurrent;
    }
    if let Some(ms) = params.max_call_time_ms {
        config.max_call_time = if ms == 0 {
            MaxCallTime::Infinity
        } else {
            MaxCallTime::Millis(ms)
        };
    }
    Ok(())
}

fn parse_language(raw: &str) -> Option<Language> {
    match raw.to_ascii_lowercase().as_str() {
        "javascript" | "js" => Some(Language::Javascript),
        "typescript" | "ts" => Some(Language::Typescript),
        "vue" => Some(Language::Vue),
        "svelte" => Some(Language::Svelte),
        _ => None,
    }
}

fn infer_language(file_name: &std::path::Path) -> Language {
    match file_name.extension().and_then(|e| e.to_str()) {
        Some("ts") | Some("tsx") | Some("mts") | Some("cts") => Language::Typescript,
        Some("js") | Some("jsx") | Some("mjs") | Some("cjs") => Language::Javascript,
        Some("vue") => Language::Vue,
        Some("svelte") => Language::Svelte,
        _ => Language::Unknown,
    }
}

#[tool_handler]
impl ServerHandler for ImportCostMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "import-cost MCP helps AI agents estimate the production-bundle weight of \
                 JavaScript/TypeScript/Vue/Svelte imports before they are added to a project.\n\n\
                 Available tools:\n\
                 1. import_cost - Given a file path (and optionally its source text), \
                 returns raw and gzip byte sizes for every externally resolvable import, \
                 as they would land in a minified ESM production bundle."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Entry point for the MCP server, invoked by the `serve` CLI subcommand.
pub fn run_server() -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let service = ImportCostMcpServer::new();
            let server = service.serve(rmcp::transport::stdio()).await?;
            server.waiting().await?;
            Ok(())
        })
}
