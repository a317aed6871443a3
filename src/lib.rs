// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod codegen;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod tooling;

// Re-export commonly used types
pub use crate::core::{
    ContextKind, Field, MethodRecord, RecordSchema, ServiceModel, TypeRef,
};

pub use crate::analyzers::{extract_records, ConventionParser, GoParser, ParsedService};

pub use crate::codegen::{
    render_adapter, render_definition, render_registry, DefinitionFormat, RenderOptions,
};

pub use crate::commands::{generate_services, GenerateOptions, GenerateReport, GeneratedService};

pub use crate::config::{load_config, GenConfig};

pub use crate::errors::{GenError, Result};
