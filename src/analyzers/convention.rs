//! Recognition of service and workflow functions in one service directory.
//!
//! Every receiver-less function whose name does not start with a lower-case
//! letter (`_Name` included) is a candidate. Its first parameter must be
//! `<ctx>.ServiceContext` or `<ctx>.WorkflowContext`, otherwise the whole
//! service fails. Its second parameter and first result must be `pkg.T` or
//! `*pkg.T`; a candidate with any other input or output shape is silently
//! left out.

use super::{resolve_type_ref, GoParser};
use crate::core::ast::GoAst;
use crate::core::{dedup_preserving_order, ContextKind, MethodRecord, RecordSchema};
use crate::errors::{GenError, Result};
use crate::io::service_files;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tree_sitter::Node;

pub const DEFAULT_CONTEXT_PACKAGE: &str = "polycode";

/// Methods and imports discovered in one service directory
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedService {
    pub methods: Vec<MethodRecord>,
    pub imports: Vec<String>,
}

impl ParsedService {
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

pub struct ConventionParser {
    parser: GoParser,
    context_package: String,
    strict_names: bool,
}

impl ConventionParser {
    pub fn new(context_package: impl Into<String>) -> Result<Self> {
        Ok(Self {
            parser: GoParser::new()?,
            context_package: context_package.into(),
            strict_names: false,
        })
    }

    /// Reject functions whose lower-cased names collide instead of keeping the last one
    pub fn with_strict_names(mut self, strict_names: bool) -> Self {
        self.strict_names = strict_names;
        self
    }

    /// Parse every non-test Go file under `dir` and extract its convention functions.
    ///
    /// All files are parsed before extraction starts; the first file that
    /// fails to parse aborts the service.
    pub fn parse_dir(&mut self, dir: &Path, schema: &RecordSchema) -> Result<ParsedService> {
        let files = service_files(dir)?;
        let asts = files
            .iter()
            .map(|path| self.parser.parse_file(path))
            .collect::<Result<Vec<_>>>()?;
        self.extract(&asts, schema)
    }

    /// Parse in-memory sources as if they were the files of one service
    pub fn parse_sources<I, P>(&mut self, sources: I, schema: &RecordSchema) -> Result<ParsedService>
    where
        I: IntoIterator<Item = (P, String)>,
        P: Into<PathBuf>,
    {
        let asts = sources
            .into_iter()
            .map(|(path, source)| self.parser.parse(source, path.into()))
            .collect::<Result<Vec<_>>>()?;
        self.extract(&asts, schema)
    }

    /// Extract methods and imports from already parsed files, in file order
    pub fn extract(&self, asts: &[GoAst], schema: &RecordSchema) -> Result<ParsedService> {
        let mut collector = MethodCollector::new(self.strict_names);
        let mut imports = Vec::new();

        for ast in asts {
            imports.extend(import_paths(ast));

            for node in ast.top_level_nodes() {
                if node.kind() != "function_declaration" {
                    continue;
                }
                if let Some(method) = self.method_from_function(ast, node, schema)? {
                    collector.push(method, ast.path())?;
                }
            }
        }

        Ok(ParsedService {
            methods: collector.finish(),
            imports: dedup_preserving_order(imports),
        })
    }

    fn method_from_function(
        &self,
        ast: &GoAst,
        function: Node<'_>,
        schema: &RecordSchema,
    ) -> Result<Option<MethodRecord>> {
        let Some(name_node) = function.child_by_field_name("name") else {
            return Ok(None);
        };
        let name = ast.text(name_node);
        if name.chars().next().is_none_or(char::is_lowercase) {
            return Ok(None);
        }

        let params = function
            .child_by_field_name("parameters")
            .map(parameter_declarations)
            .unwrap_or_default();
        let kind = self.validate_context_parameter(ast, name, &params)?;

        let input = param_type(params[1]).and_then(|node| resolve_type_ref(ast, node));
        let output = function
            .child_by_field_name("result")
            .and_then(first_result_type)
            .and_then(|node| resolve_type_ref(ast, node));

        match (input, output) {
            (Some(input), Some(output)) => {
                debug!(
                    "Recognized {} {} ({} -> {}) in {}",
                    kind.type_name(),
                    name,
                    input.name,
                    output.name,
                    ast.path().display()
                );
                Ok(Some(MethodRecord::new(name, kind, input, output, schema)))
            }
            _ => {
                debug!(
                    "Skipping {} in {}: unsupported input or output type",
                    name,
                    ast.path().display()
                );
                Ok(None)
            }
        }
    }

    /// Check the parameter count and the context capability of the first parameter
    fn validate_context_parameter(
        &self,
        ast: &GoAst,
        function: &str,
        params: &[Node<'_>],
    ) -> Result<ContextKind> {
        if params.len() < 2 {
            return Err(GenError::convention(
                ast.path(),
                function,
                "does not have enough parameters",
            ));
        }

        let first = params[0];
        let kind = (first.kind() == "parameter_declaration")
            .then(|| param_type(first))
            .flatten()
            .filter(|ty| ty.kind() == "qualified_type")
            .and_then(|ty| {
                let package = ty.child_by_field_name("package")?;
                let name = ty.child_by_field_name("name")?;
                if ast.text(package) != self.context_package {
                    return None;
                }
                ContextKind::from_type_name(ast.text(name))
            });

        kind.ok_or_else(|| {
            GenError::convention(
                ast.path(),
                function,
                format!(
                    "first parameter must be {pkg}.ServiceContext or {pkg}.WorkflowContext",
                    pkg = self.context_package
                ),
            )
        })
    }
}

/// Tracks recognized methods and resolves normalized-name collisions
struct MethodCollector {
    slots: Vec<Option<(MethodRecord, PathBuf)>>,
    by_name: HashMap<String, usize>,
    strict_names: bool,
}

impl MethodCollector {
    fn new(strict_names: bool) -> Self {
        Self {
            slots: Vec::new(),
            by_name: HashMap::new(),
            strict_names,
        }
    }

    fn push(&mut self, method: MethodRecord, path: &Path) -> Result<()> {
        if let Some(&index) = self.by_name.get(&method.normalized_name) {
            if let Some((previous, previous_path)) = self.slots[index].take() {
                if self.strict_names {
                    return Err(GenError::DuplicateMethod {
                        path: path.to_path_buf(),
                        function: method.original_name,
                        previous: format!("{} ({})", previous.original_name, previous_path.display()),
                        name: method.normalized_name,
                    });
                }
                warn!(
                    "{} in {} replaces {} from {}: both dispatch as {:?}",
                    method.original_name,
                    path.display(),
                    previous.original_name,
                    previous_path.display(),
                    method.normalized_name
                );
            }
        }
        self.by_name
            .insert(method.normalized_name.clone(), self.slots.len());
        self.slots.push(Some((method, path.to_path_buf())));
        Ok(())
    }

    fn finish(self) -> Vec<MethodRecord> {
        self.slots
            .into_iter()
            .flatten()
            .map(|(method, _)| method)
            .collect()
    }
}

/// Import paths of a file as written, quotes removed, in source order
pub fn import_paths(ast: &GoAst) -> Vec<String> {
    let mut paths = Vec::new();
    for decl in ast
        .top_level_nodes()
        .into_iter()
        .filter(|n| n.kind() == "import_declaration")
    {
        collect_import_specs(ast, decl, &mut paths);
    }
    paths
}

fn collect_import_specs(ast: &GoAst, node: Node<'_>, paths: &mut Vec<String>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                if let Some(path) = child.child_by_field_name("path") {
                    paths.push(
                        ast.text(path)
                            .trim_matches(|c| c == '"' || c == '`')
                            .to_string(),
                    );
                }
            }
            "import_spec_list" => collect_import_specs(ast, child, paths),
            _ => {}
        }
    }
}

fn parameter_declarations(list: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|n| {
            matches!(
                n.kind(),
                "parameter_declaration" | "variadic_parameter_declaration"
            )
        })
        .collect()
}

/// Declared type of a plain parameter; variadic parameters never match
fn param_type(param: Node<'_>) -> Option<Node<'_>> {
    if param.kind() != "parameter_declaration" {
        return None;
    }
    param.child_by_field_name("type")
}

/// First declared result type, whether the result is bare or a parameter list
fn first_result_type(result: Node<'_>) -> Option<Node<'_>> {
    if result.kind() == "parameter_list" {
        parameter_declarations(result)
            .first()
            .and_then(|first| param_type(*first))
    } else {
        Some(result)
    }
}
