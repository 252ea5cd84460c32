//! Vue/Svelte dialects: isolate the `<script>` block (honoring its `lang`
//! attribute) and delegate to the JS/TS grammar. Template and style content
//! is never parsed as script.

use std::path::Path;

use regex::Regex;
use std::sync::LazyLock;

use crate::core::data::{ImportDeclaration, Language};
use crate::core::error::ImportCostError;

use super::javascript;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script(?P<attrs>[^>]*)>(?P<body>.*?)</script>"#).unwrap()
});

static LANG_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"lang\s*=\s*["']?([A-Za-z]+)["']?"#).unwrap());

pub(super) fn extract(
    file_name: &Path,
    source: &str,
    _language: Language,
) -> Result<Vec<ImportDeclaration>, ImportCostError> {
    let mut declarations = Vec::new();

    for block in SCRIPT_BLOCK.captures_iter(source) {
        let attrs = block.name("attrs").map(|m| m.as_str()).unwrap_or("");
        let body_match = block.name("body");
        let body = body_match.map(|m| m.as_str()).unwrap_or("");
        let is_typescript = LANG_ATTR
            .captures(attrs)
            .map(|c| c[1].eq_ignore_ascii_case("ts") || c[1].eq_ignore_ascii_case("typescript"))
            .unwrap_or(false);

        // the JS/TS grammar reports lines relative to `body`; shift them
        // back to the script block's position in the original source.
        let line_offset = body_match
            .map(|m| source[..m.start()].matches('\n').count())
            .unwrap_or(0);

        declarations.extend(
            javascript::extract(file_name, body, is_typescript)?
                .into_iter()
                .map(|mut decl| {
                    decl.line += line_offset;
                    decl
                }),
        );
    }

    Ok(declarations)
}
