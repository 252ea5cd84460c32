//! JavaScript/TypeScript dialect: parses the buffer with swc and walks the
//! module looking for static imports, `require(...)` calls and dynamic
//! `import(...)` calls.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use swc_common::{BytePos, FileName, Globals, SourceMap, Span, GLOBALS};
use swc_ecma_ast::{
    CallExpr, Callee, Expr, ImportDecl, ImportSpecifier, Lit, Module, ModuleDecl, ModuleItem, Pat,
    VarDeclarator,
};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::data::ImportDeclaration;
use crate::core::error::ImportCostError;

use super::{canonical_string, Binding};

pub(super) fn extract(
    file_name: &Path,
    source: &str,
    typescript: bool,
) -> Result<Vec<ImportDeclaration>, ImportCostError> {
    let (module, source_map) = parse_module(file_name, source, typescript)?;

    let mut visitor = ImportVisitor {
        file_name: file_name.to_path_buf(),
        source_map,
        declarations: Vec::new(),
        handled_requires: HashSet::new(),
    };
    module.visit_with(&mut visitor);
    Ok(visitor.declarations)
}

fn parse_module(
    file_name: &Path,
    source: &str,
    typescript: bool,
) -> Result<(Module, Arc<SourceMap>), ImportCostError> {
    GLOBALS.set(&Globals::new(), || {
        let source_map: Arc<SourceMap> = Arc::new(SourceMap::default());
        let source_file = source_map.new_source_file(
            FileName::Real(file_name.to_path_buf()).into(),
            source.to_string(),
        );

        let syntax = if typescript {
            Syntax::Typescript(TsSyntax {
                tsx: true,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: true,
                ..Default::default()
            })
        };

        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let module = parser
            .parse_module()
            .map_err(|e| ImportCostError::ParseError {
                file: file_name.display().to_string(),
                reason: format!("{:?}", e),
            })?;
        Ok((module, source_map))
    })
}

struct ImportVisitor {
    file_name: std::path::PathBuf,
    source_map: Arc<SourceMap>,
    declarations: Vec<ImportDeclaration>,
    /// `require(...)` calls already emitted via a destructuring declarator,
    /// keyed by call-expression start position, so the generic
    /// `visit_call_expr` walk does not double-count them.
    handled_requires: HashSet<BytePos>,
}

impl ImportVisitor {
    fn push(&mut self, specifier: &str, bindings: &[Binding], span: Span) {
        let line = self.source_map.lookup_char_pos(span.lo).line;
        self.declarations.push(ImportDeclaration {
            name: specifier.to_string(),
            line,
            string: canonical_string(specifier, bindings),
            file_name: self.file_name.clone(),
        });
    }
}

impl Visit for ImportVisitor {
    fn visit_module_item(&mut self, item: &ModuleItem) {
        if let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item {
            self.visit_static_import(import);
        }
        item.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        self.visit_require_or_dynamic(call);
        call.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, declarator: &VarDeclarator) {
        // const { a, b } = require("x") / const ns = require("x")
        if let Some(init) = &declarator.init
            && let Expr::Call(call) = init.as_ref()
            && let Some(specifier) = require_specifier(call)
        {
            self.handled_requires.insert(call.span.lo);
            let bindings = bindings_from_pattern(&declarator.name);
            self.push(&specifier, &bindings, call.span);
        }
        declarator.visit_children_with(self);
    }
}

impl ImportVisitor {
    fn visit_static_import(&mut self, import: &ImportDecl) {
        if import.type_only {
            return;
        }
        let specifier = import.src.value.to_string();
        if has_interpolation(&specifier) {
            return;
        }
        let bindings: Vec<Binding> = import
            .specifiers
            .iter()
            .filter_map(|spec| match spec {
                ImportSpecifier::Default(_) => Some(Binding::Default),
                ImportSpecifier::Namespace(_) => Some(Binding::Namespace),
                ImportSpecifier::Named(named) => {
                    if named.is_type_only {
                        None
                    } else {
                        Some(Binding::Named(named.local.sym.to_string()))
                    }
                }
            })
            .collect();
        self.push(&specifier, &bindings, import.span);
    }

    fn visit_require_or_dynamic(&mut self, call: &CallExpr) {
        if let Some(specifier) = dynamic_import_specifier(call) {
            self.push(&specifier, &[], call.span);
            return;
        }
        if self.handled_requires.contains(&call.span.lo) {
            return;
        }
        if let Some(specifier) = require_specifier(call) {
            // bare `require("x")` with no destructuring: side-effect import.
            self.push(&specifier, &[], call.span);
        }
    }
}

fn dynamic_import_specifier(call: &CallExpr) -> Option<String> {
    if !matches!(call.callee, Callee::Import(_)) {
        return None;
    }
    literal_string_arg(call)
}

fn require_specifier(call: &CallExpr) -> Option<String> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Ident(ident) = callee.as_ref() else {
        return None;
    };
    if ident.sym.as_ref() != "require" {
        return None;
    }
    literal_string_arg(call)
}

fn literal_string_arg(call: &CallExpr) -> Option<String> {
    let arg = call.args.first()?;
    if arg.spread.is_some() {
        return None;
    }
    match arg.expr.as_ref() {
        Expr::Lit(Lit::Str(s)) => Some(s.value.to_string()),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() && tpl.quasis.len() == 1 => {
            Some(tpl.quasis[0].raw.to_string())
        }
        _ => None,
    }
}

fn has_interpolation(specifier: &str) -> bool {
    specifier.contains("${")
}

fn bindings_from_pattern(pat: &Pat) -> Vec<Binding> {
    match pat {
        Pat::Object(obj) => obj
            .props
            .iter()
            .filter_map(|prop| match prop {
                swc_ecma_ast::ObjectPatProp::Assign(a) => Some(Binding::Named(a.key.sym.to_string())),
                swc_ecma_ast::ObjectPatProp::KeyValue(kv) => {
                    kv.key.as_ident().map(|i| Binding::Named(i.sym.to_string()))
                }
                swc_ecma_ast::ObjectPatProp::Rest(_) => None,
            })
            .collect(),
        Pat::Ident(_) => vec![Binding::Default],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_js(source: &str) -> Vec<ImportDeclaration> {
        extract(Path::new("/project/src/index.js"), source, false).unwrap()
    }

    #[test]
    fn static_named_import() {
        let decls = extract_js("import { expect } from 'chai';");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "chai");
        assert_eq!(decls[0].string, "import { expect } from \"chai\";");
    }

    #[test]
    fn static_default_and_named_are_order_independent() {
        let a = extract_js("import React, { useState, useEffect } from 'react';");
        let b = extract_js("import React, { useEffect, useState } from 'react';");
        assert_eq!(a[0].string, b[0].string);
    }

    #[test]
    fn side_effect_import() {
        let decls = extract_js("import 'some-polyfill';");
        assert_eq!(decls[0].name, "some-polyfill");
        assert_eq!(decls[0].string, "import \"some-polyfill\";");
    }

    #[test]
    fn dynamic_import_is_captured() {
        let decls = extract_js("const mod = import('lodash');");
        assert_eq!(decls[0].name, "lodash");
    }

    #[test]
    fn require_with_destructuring() {
        let decls = extract_js("const { expect } = require('chai');");
        assert_eq!(decls[0].name, "chai");
        assert_eq!(decls[0].string, "import { expect } from \"chai\";");
    }

    #[test]
    fn template_literal_with_interpolation_is_skipped() {
        let decls = extract_js("import(`${base}/x`);");
        assert!(decls.is_empty());
    }

    #[test]
    fn syntax_error_is_fatal() {
        let result = extract(Path::new("/a.js"), "import { from 'chai';", false);
        assert!(matches!(result, Err(ImportCostError::ParseError { .. })));
    }
}
