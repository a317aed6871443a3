use crate::codegen::{DefinitionFormat, RenderOptions, DEFAULT_SDK_IMPORT};
use crate::analyzers::convention::DEFAULT_CONTEXT_PACKAGE;
use serde::{Deserialize, Serialize};

/// Project-level generator settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenConfig {
    /// Directory under the project root whose subdirectories are services
    pub services_dir: String,

    /// Directory under the project root receiving generated adapters
    pub output_dir: String,

    /// Directory under `output_dir` receiving definition documents
    pub definition_dir: String,

    pub definition_format: DefinitionFormat,

    /// Package qualifier of `ServiceContext` / `WorkflowContext`
    pub context_package: String,

    /// Import path of the runtime SDK used by generated adapters
    pub sdk_import: String,

    /// Fail on duplicate record or method names instead of keeping the last one
    pub strict_names: bool,

    /// Run the import formatter over the output directory after generation
    pub format_imports: bool,

    /// Emit the `@definition` introspection case
    pub production: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            services_dir: "services".to_string(),
            output_dir: ".polycode".to_string(),
            definition_dir: "definition".to_string(),
            definition_format: DefinitionFormat::Yaml,
            context_package: DEFAULT_CONTEXT_PACKAGE.to_string(),
            sdk_import: DEFAULT_SDK_IMPORT.to_string(),
            strict_names: false,
            format_imports: true,
            production: true,
        }
    }
}

impl GenConfig {
    /// Check values that would otherwise produce broken paths or code
    pub fn validate(&self) -> Result<(), String> {
        let non_empty = [
            ("services_dir", &self.services_dir),
            ("output_dir", &self.output_dir),
            ("definition_dir", &self.definition_dir),
            ("context_package", &self.context_package),
            ("sdk_import", &self.sdk_import),
        ];
        if let Some((key, _)) = non_empty.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(format!("{key} must not be empty"));
        }
        if !crate::codegen::is_go_identifier(&self.context_package) {
            return Err(format!(
                "context_package {:?} is not a Go identifier",
                self.context_package
            ));
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            context_package: self.context_package.clone(),
            sdk_import: self.sdk_import.clone(),
            services_dir: self.services_dir.clone(),
        }
    }
}
