//! Project-wide extraction of record (struct) field schemas.
//!
//! Unparsable files are skipped so one broken file cannot hide the records
//! declared everywhere else.

use super::GoParser;
use crate::core::ast::GoAst;
use crate::core::{Field, RecordSchema};
use crate::errors::{GenError, Result};
use crate::io::go_files;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tree_sitter::Node;

/// Build the record schema for every struct type declared under `root`.
///
/// Directories in `excluded` (generated output) are not read, so a rerun
/// never sees its own adapters. Later declarations of an already seen name replace earlier ones; with
/// `strict_names` set the collision is reported as an error instead.
pub fn extract_records(
    root: &Path,
    excluded: &[PathBuf],
    strict_names: bool,
) -> Result<RecordSchema> {
    let mut parser = GoParser::new()?;
    let mut schema = RecordSchema::new();
    let mut declared_in: HashMap<String, PathBuf> = HashMap::new();

    for path in go_files(root, excluded)? {
        let ast = match parser.parse_file(&path) {
            Ok(ast) => ast,
            Err(e) => {
                debug!("Skipping {} during record extraction: {}", path.display(), e);
                continue;
            }
        };

        for (name, fields) in records_in(&ast) {
            if let Some(previous) = declared_in.get(&name) {
                if strict_names {
                    return Err(GenError::DuplicateRecord {
                        path: path.clone(),
                        previous: previous.clone(),
                        name,
                    });
                }
                warn!(
                    "Record type {} in {} replaces the one declared in {}",
                    name,
                    path.display(),
                    previous.display()
                );
            }
            declared_in.insert(name.clone(), path.clone());
            schema.insert(name, fields);
        }
    }

    debug!("Extracted {} record types under {}", schema.len(), root.display());
    Ok(schema)
}

/// Struct type declarations of one file with their named fields, in source order
pub fn records_in(ast: &GoAst) -> Vec<(String, Vec<Field>)> {
    ast.top_level_nodes()
        .into_iter()
        .filter(|node| node.kind() == "type_declaration")
        .flat_map(|decl| {
            let mut cursor = decl.walk();
            decl.named_children(&mut cursor)
                .filter(|spec| spec.kind() == "type_spec")
                .collect::<Vec<_>>()
        })
        .filter_map(|spec| record_from_spec(ast, spec))
        .collect()
}

fn record_from_spec(ast: &GoAst, spec: Node<'_>) -> Option<(String, Vec<Field>)> {
    let name = spec.child_by_field_name("name")?;
    let struct_type = spec.child_by_field_name("type")?;
    if struct_type.kind() != "struct_type" {
        return None;
    }
    Some((ast.text(name).to_string(), struct_fields(ast, struct_type)))
}

/// Named fields of a `struct_type`; embedded fields carry no name and are skipped.
fn struct_fields(ast: &GoAst, struct_type: Node<'_>) -> Vec<Field> {
    let mut fields = Vec::new();
    let mut cursor = struct_type.walk();
    let Some(list) = struct_type
        .named_children(&mut cursor)
        .find(|n| n.kind() == "field_declaration_list")
    else {
        return fields;
    };

    let mut list_cursor = list.walk();
    for declaration in list
        .named_children(&mut list_cursor)
        .filter(|n| n.kind() == "field_declaration")
    {
        let Some(field_type) = declaration.child_by_field_name("type") else {
            continue;
        };
        let type_text = ast.text(field_type);
        let mut name_cursor = declaration.walk();
        for name in declaration.children_by_field_name("name", &mut name_cursor) {
            fields.push(Field::new(ast.text(name), type_text));
        }
    }
    fields
}
