//! Import Extractor — turns a source buffer into a normalized list of
//! import declarations. Pure: no I/O, no knowledge of the filesystem layout
//! that the resolver later walks.

mod component;
mod javascript;

use std::path::Path;

use crate::core::data::{ImportDeclaration, Language};
use crate::core::error::ImportCostError;

/// A single binding brought in by an import/require, stripped of its local
/// alias — only the shape that affects bundle output survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Binding {
    Default,
    Namespace,
    Named(String),
}

pub fn extract(
    file_name: &Path,
    source: &str,
    language: Language,
) -> Result<Vec<ImportDeclaration>, ImportCostError> {
    let raw = match language {
        Language::Javascript => javascript::extract(file_name, source, false)?,
        Language::Typescript => javascript::extract(file_name, source, true)?,
        Language::Vue | Language::Svelte => component::extract(file_name, source, language)?,
        Language::Unknown => return Ok(Vec::new()),
    };

    Ok(raw
        .into_iter()
        .filter(|d| !is_local_specifier(&d.name))
        .collect())
}

fn is_local_specifier(name: &str) -> bool {
    name.starts_with("./") || name.starts_with("../") || name.starts_with('/')
}

/// Extract the top-level package name from a specifier (`chai` from
/// `chai/abc`, `@scope/pkg` from `@scope/pkg/sub`).
pub fn package_name(specifier: &str) -> &str {
    let mut parts = specifier.splitn(3, '/');
    match parts.next() {
        Some(first) if first.starts_with('@') => {
            // scoped: @scope/pkg[/rest]
            match parts.next() {
                Some(second) => {
                    let end = first.len() + 1 + second.len();
                    &specifier[..end]
                }
                None => specifier,
            }
        }
        Some(first) => first,
        None => specifier,
    }
}

/// Build the canonical, order-independent re-materialization of a
/// specifier + its bindings used to key the fingerprint and the cache.
pub(crate) fn canonical_string(specifier: &str, bindings: &[Binding]) -> String {
    let has_default = bindings.iter().any(|b| *b == Binding::Default);
    let has_namespace = bindings.iter().any(|b| *b == Binding::Namespace);
    let mut named: Vec<&str> = bindings
        .iter()
        .filter_map(|b| match b {
            Binding::Named(n) => Some(n.as_str()),
            _ => None,
        })
        .collect();
    named.sort_unstable();
    named.dedup();

    if has_namespace {
        return format!("import * as __ns from {:?};", specifier);
    }

    if has_default && named.is_empty() {
        return format!("import __default from {:?};", specifier);
    }

    if named.is_empty() {
        return format!("import {:?};", specifier);
    }

    let named_list = named.join(", ");
    if has_default {
        format!(
            "import __default, {{ {} }} from {:?};",
            named_list, specifier
        )
    } else {
        format!("import {{ {} }} from {:?};", named_list, specifier)
    }
}
