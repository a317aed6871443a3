//! Structured service definition documents for external tooling.

use crate::core::ServiceModel;
use crate::errors::{GenError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionFormat {
    #[default]
    Yaml,
    Json,
}

impl DefinitionFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yml",
            Self::Json => "json",
        }
    }
}

/// Serialize the full service model, methods and schemas included
pub fn render_definition(model: &ServiceModel, format: DefinitionFormat) -> Result<String> {
    let rendered = match format {
        DefinitionFormat::Yaml => serde_yaml::to_string(model).map_err(|e| e.to_string()),
        DefinitionFormat::Json => serde_json::to_string_pretty(model)
            .map(|json| json + "\n")
            .map_err(|e| e.to_string()),
    };
    rendered.map_err(|message| GenError::render(&model.service_name, message))
}
