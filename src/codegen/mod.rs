//! Rendering of generated artifacts from a [`ServiceModel`].
//!
//! Everything here is pure: artifacts are rendered to strings in full and
//! only written by the orchestrator once rendering succeeded.

pub mod adapter;
pub mod definition;
pub mod registry;

pub use adapter::{render_adapter, DEFINITION_REQUEST};
pub use definition::{render_definition, DefinitionFormat};
pub use registry::render_registry;

use crate::analyzers::convention::DEFAULT_CONTEXT_PACKAGE;
use crate::core::ServiceModel;
use crate::errors::{GenError, Result};

pub const GENERATED_HEADER: &str = "// Code generated by polycode-gen. DO NOT EDIT.";

/// Go package name of every generated file
pub const ADAPTER_PACKAGE: &str = "_polycode";

pub const DEFAULT_SDK_IMPORT: &str = "github.com/cloudimpl/next-coder-sdk/polycode";

/// Names the adapter needs beyond the service model itself
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Package qualifier of the context capabilities and the registry
    pub context_package: String,
    /// Import path of the runtime SDK
    pub sdk_import: String,
    /// Directory (relative to the module root) holding the services
    pub services_dir: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            context_package: DEFAULT_CONTEXT_PACKAGE.to_string(),
            sdk_import: DEFAULT_SDK_IMPORT.to_string(),
            services_dir: "services".to_string(),
        }
    }
}

/// Go identifier rules: a letter or `_` followed by letters, digits or `_`
pub fn is_go_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn is_qualified_identifier(name: &str) -> bool {
    match name.split_once('.') {
        Some((package, ident)) => is_go_identifier(package) && is_go_identifier(ident),
        None => false,
    }
}

fn is_safe_literal(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(|c| c == '"' || c == '\\' || c.is_control())
}

/// Reject models that cannot be rendered into valid Go
pub(crate) fn validate_model(model: &ServiceModel) -> Result<()> {
    let fail = |message: String| Err(GenError::render(&model.service_name, message));

    if !is_safe_literal(&model.service_name) {
        return fail(format!("service name {:?} cannot be quoted", model.service_name));
    }
    if !is_go_identifier(&model.struct_name) {
        return fail(format!(
            "struct name {:?} derived from the service name is not a Go identifier",
            model.struct_name
        ));
    }
    if !is_safe_literal(&model.module_name) {
        return fail(format!("module name {:?} cannot be quoted", model.module_name));
    }
    if let Some(import) = model.imports.iter().find(|i| !is_safe_literal(i)) {
        return fail(format!("import path {import:?} cannot be quoted"));
    }

    for method in &model.methods {
        if !is_go_identifier(&method.original_name) {
            return fail(format!(
                "method name {:?} is not a Go identifier",
                method.original_name
            ));
        }
        for type_name in [&method.input_type_name, &method.output_type_name] {
            if !is_qualified_identifier(type_name) {
                return fail(format!(
                    "method {}: type {:?} is not a qualified type name",
                    method.original_name, type_name
                ));
            }
        }
    }
    Ok(())
}
