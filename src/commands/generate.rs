//! The full generation run: manifest, record schema, then every service.
//!
//! Services are processed one at a time in directory order. The first fatal
//! error aborts the run; artifacts written for earlier services stay on disk.

use crate::analyzers::{extract_records, ConventionParser};
use crate::codegen::registry::REGISTRY_FILE;
use crate::codegen::{render_adapter, render_definition, render_registry};
use crate::config::GenConfig;
use crate::core::{RecordSchema, ServiceModel};
use crate::errors::Result;
use crate::io::manifest::MANIFEST_FILE;
use crate::io::{dir_exists, ensure_dir, read_module_name, subdirectories, write_file};
use crate::tooling::{FormatterOutcome, ImportFormatter};
use std::path::{Path, PathBuf};
use tracing::{info, info_span, warn};

/// Inputs of one generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub root: PathBuf,
    pub config: GenConfig,
    pub formatter: ImportFormatter,
}

impl GenerateOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: GenConfig::default(),
            formatter: ImportFormatter::default(),
        }
    }

    pub fn with_config(mut self, config: GenConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_production(mut self, production: bool) -> Self {
        self.config.production = production;
        self
    }

    pub fn with_formatter(mut self, formatter: ImportFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn services_dir(&self) -> PathBuf {
        self.root.join(&self.config.services_dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output_dir)
    }

    pub fn definition_dir(&self) -> PathBuf {
        self.output_dir().join(&self.config.definition_dir)
    }
}

/// Artifacts written for one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedService {
    pub service_name: String,
    pub struct_name: String,
    pub method_count: usize,
    pub adapter_path: PathBuf,
    pub definition_path: PathBuf,
}

/// Summary of a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub module_name: String,
    pub generated: Vec<GeneratedService>,
    /// Services without any convention function; nothing was written for them
    pub skipped: Vec<String>,
    pub registry_path: Option<PathBuf>,
    pub formatter: FormatterOutcome,
}

impl GenerateReport {
    fn new(module_name: String) -> Self {
        Self {
            module_name,
            generated: Vec::new(),
            skipped: Vec::new(),
            registry_path: None,
            formatter: FormatterOutcome::Skipped("not run".to_string()),
        }
    }
}

/// Regenerate the adapters and definitions of every service under `options.root`.
///
/// Safe to call repeatedly; an unchanged source tree produces byte-identical
/// artifacts.
pub fn generate_services(options: &GenerateOptions) -> Result<GenerateReport> {
    let config = &options.config;
    let module_name = read_module_name(&options.root.join(MANIFEST_FILE))?;
    let schema = extract_records(&options.root, &[options.output_dir()], config.strict_names)?;
    let mut report = GenerateReport::new(module_name);

    let services_dir = options.services_dir();
    if !dir_exists(&services_dir) {
        warn!("No services folder found at {}", services_dir.display());
    } else {
        let mut parser = ConventionParser::new(config.context_package.as_str())?
            .with_strict_names(config.strict_names);
        let service_dirs = subdirectories(&services_dir)?;

        for (index, service_dir) in service_dirs.iter().enumerate() {
            let service_name = dir_name(service_dir);
            let span = info_span!("service", name = %service_name);
            let _guard = span.enter();
            info!(
                "Processing service [{}/{}]: {}",
                index + 1,
                service_dirs.len(),
                service_dir.display()
            );

            match generate_service(options, &mut parser, &schema, &report.module_name, service_dir)? {
                Some(generated) => {
                    info!(
                        "Generated {} methods into {}",
                        generated.method_count,
                        generated.adapter_path.display()
                    );
                    report.generated.push(generated);
                }
                None => {
                    info!("No methods found, nothing generated");
                    report.skipped.push(service_name);
                }
            }
        }
        info!("Finished generating code for services");
    }

    if !report.generated.is_empty() {
        report.registry_path = Some(write_registry(options, &report.generated)?);
    }

    report.formatter = format_output(options);
    Ok(report)
}

fn generate_service(
    options: &GenerateOptions,
    parser: &mut ConventionParser,
    schema: &RecordSchema,
    module_name: &str,
    service_dir: &Path,
) -> Result<Option<GeneratedService>> {
    let parsed = parser.parse_dir(service_dir, schema)?;
    if parsed.is_empty() {
        return Ok(None);
    }

    let config = &options.config;
    let model = ServiceModel::new(
        module_name,
        dir_name(service_dir),
        parsed.methods,
        parsed.imports,
        config.production,
    );

    // Render both artifacts before touching the file system
    let adapter = render_adapter(&model, &config.render_options())?;
    let definition = render_definition(&model, config.definition_format)?;

    let output_dir = options.output_dir();
    let definition_dir = options.definition_dir();
    ensure_dir(&output_dir)?;
    ensure_dir(&definition_dir)?;

    let adapter_path = output_dir.join(format!("{}.go", model.service_name));
    let definition_path = definition_dir.join(format!(
        "{}.{}",
        model.service_name,
        config.definition_format.extension()
    ));
    write_file(&adapter_path, &adapter)?;
    write_file(&definition_path, &definition)?;
    info!("Generated definition for: {}", definition_path.display());

    Ok(Some(GeneratedService {
        method_count: model.methods.len(),
        service_name: model.service_name,
        struct_name: model.struct_name,
        adapter_path,
        definition_path,
    }))
}

fn write_registry(options: &GenerateOptions, generated: &[GeneratedService]) -> Result<PathBuf> {
    let struct_names: Vec<String> = generated.iter().map(|g| g.struct_name.clone()).collect();
    let source = render_registry(&struct_names)?;
    let path = options.output_dir().join(REGISTRY_FILE);
    write_file(&path, &source)?;
    Ok(path)
}

/// Normalize imports of the output directory; failures are reported, not fatal
fn format_output(options: &GenerateOptions) -> FormatterOutcome {
    let output_dir = options.output_dir();
    if !options.config.format_imports {
        return FormatterOutcome::Skipped("import formatting disabled".to_string());
    }
    if !dir_exists(&output_dir) {
        return FormatterOutcome::Skipped("no output directory".to_string());
    }

    info!("Cleaning up imports in {}", output_dir.display());
    let outcome = options.formatter.format_dir(&output_dir);
    match &outcome {
        FormatterOutcome::Formatted => info!("Imports cleaned"),
        FormatterOutcome::Skipped(reason) => warn!("Import formatting skipped: {}", reason),
        FormatterOutcome::Failed(message) => warn!("Error cleaning up imports: {}", message),
    }
    outcome
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
