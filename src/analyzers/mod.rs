//! Go source analysis on top of tree-sitter.
//!
//! [`GoParser`] turns files into [`GoAst`]s; [`records`] builds the
//! project-wide record schema and [`convention`] recognizes the service and
//! workflow functions of one service directory.

pub mod convention;
pub mod records;

use crate::core::ast::{first_error_position, GoAst};
use crate::core::TypeRef;
use crate::errors::{GenError, Result};
use crate::io::read_file;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

pub use convention::{ConventionParser, ParsedService};
pub use records::extract_records;

/// Tree-sitter parser configured for Go.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_go::LANGUAGE.into())?;
        Ok(Self { parser })
    }

    /// Parse `source`, failing if the tree contains any syntax error.
    pub fn parse(&mut self, source: String, path: PathBuf) -> Result<GoAst> {
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| GenError::parse(&path, "parser produced no syntax tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            let message = match first_error_position(root) {
                Some((line, column)) => format!("syntax error at {line}:{column}"),
                None => "syntax error".to_string(),
            };
            return Err(GenError::parse(&path, message));
        }

        Ok(GoAst { tree, source, path })
    }

    pub fn parse_file(&mut self, path: &Path) -> Result<GoAst> {
        let source = read_file(path)?;
        self.parse(source, path.to_path_buf())
    }
}

/// `pkg.Name` for a `qualified_type` node, `None` for any other node.
pub(crate) fn qualified_name(ast: &GoAst, node: Node<'_>) -> Option<String> {
    if node.kind() != "qualified_type" {
        return None;
    }
    let package = node.child_by_field_name("package")?;
    let name = node.child_by_field_name("name")?;
    Some(format!("{}.{}", ast.text(package), ast.text(name)))
}

/// Resolve a parameter or result type of the form `pkg.T` or `*pkg.T`.
///
/// Any other shape (builtin, local type, slice, generic, double pointer,
/// parenthesized type) resolves to `None`.
pub(crate) fn resolve_type_ref(ast: &GoAst, node: Node<'_>) -> Option<TypeRef> {
    match node.kind() {
        "pointer_type" => {
            let inner = node.named_child(0)?;
            qualified_name(ast, inner).map(|name| TypeRef {
                name,
                is_pointer: true,
            })
        }
        "qualified_type" => qualified_name(ast, node).map(|name| TypeRef {
            name,
            is_pointer: false,
        }),
        _ => None,
    }
}
