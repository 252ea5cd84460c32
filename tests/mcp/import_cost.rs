use import_cost::mcp::{ImportCostMcpServer, types::ImportCostParams};
use rmcp::handler::server::wrapper::Parameters;

use crate::{McpTestFixture, extract_tool_result_json};

#[tokio::test]
async fn test_import_cost_with_no_imports() {
    let fixture = McpTestFixture::new().unwrap();
    let file_path = fixture.write_file("index.js", "console.log('hi');\n").unwrap();
    let server = ImportCostMcpServer::new();

    let params = Parameters(ImportCostParams {
        file_path: file_path.to_string_lossy().to_string(),
        source: None,
        language: None,
        concurrent: None,
        max_call_time_ms: None,
    });

    let result = server.import_cost(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["entries"].as_array().unwrap().len(), 0);
    assert_eq!(json_result["totalSize"], 0);
    assert_eq!(json_result["totalGzip"], 0);
}

#[tokio::test]
async fn test_import_cost_uses_inline_source_over_file_contents() {
    let fixture = McpTestFixture::new().unwrap();
    // The file on disk has an import, but `source` overrides it with a file
    // that has none; the tool should honor the inline source.
    let file_path = fixture
        .write_file("index.js", "import pad from 'left-pad';\n")
        .unwrap();
    let server = ImportCostMcpServer::new();

    let params = Parameters(ImportCostParams {
        file_path: file_path.to_string_lossy().to_string(),
        source: Some("console.log('hi');\n".to_string()),
        language: None,
        concurrent: None,
        max_call_time_ms: None,
    });

    let result = server.import_cost(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["entries"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_import_cost_drops_unresolvable_import() {
    let fixture = McpTestFixture::new().unwrap();
    // No node_modules directory is installed, so `left-pad` can't be
    // resolved and is silently dropped rather than reported.
    let file_path = fixture
        .write_file("index.js", "import pad from 'left-pad';\n")
        .unwrap();
    let server = ImportCostMcpServer::new();

    let params = Parameters(ImportCostParams {
        file_path: file_path.to_string_lossy().to_string(),
        source: None,
        language: None,
        concurrent: None,
        max_call_time_ms: None,
    });

    let result = server.import_cost(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["entries"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_import_cost_resolves_installed_package() {
    let fixture = McpTestFixture::new().unwrap();
    fixture.install_package("left-pad", &[]).unwrap();
    let file_path = fixture
        .write_file("index.js", "import pad from 'left-pad';\n")
        .unwrap();
    let server = ImportCostMcpServer::new();

    let params = Parameters(ImportCostParams {
        file_path: file_path.to_string_lossy().to_string(),
        source: None,
        language: None,
        concurrent: None,
        max_call_time_ms: None,
    });

    let result = server.import_cost(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    // `left-pad` resolves, so it's reported; no bundler is installed in the
    // test environment, so sizing it fails deterministically.
    let entries = json_result["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "left-pad");
    assert_eq!(entries[0]["error"], "bundle_error");
}

#[tokio::test]
async fn test_import_cost_rejects_unknown_language_override() {
    let fixture = McpTestFixture::new().unwrap();
    let file_path = fixture.write_file("index.js", "console.log('hi');\n").unwrap();
    let server = ImportCostMcpServer::new();

    let params = Parameters(ImportCostParams {
        file_path: file_path.to_string_lossy().to_string(),
        source: None,
        language: Some("cobol".to_string()),
        concurrent: None,
        max_call_time_ms: None,
    });

    let result = server.import_cost(params).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_import_cost_rejects_missing_file() {
    let fixture = McpTestFixture::new().unwrap();
    let missing = fixture.root() + "/does-not-exist.js";
    let server = ImportCostMcpServer::new();

    let params = Parameters(ImportCostParams {
        file_path: missing,
        source: None,
        language: None,
        concurrent: None,
        max_call_time_ms: None,
    });

    let result = server.import_cost(params).await;
    assert!(result.is_err());
}
