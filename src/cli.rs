use crate::codegen::DefinitionFormat;
use crate::config::GenConfig;
use clap::Parser;
use std::path::PathBuf;

pub mod setup;

#[derive(Parser, Debug)]
#[command(name = "polycode-gen")]
#[command(about = "Generate service adapters and definitions for polycode Go services", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project root holding go.mod and the services directory
    #[arg(short = 'f', long = "path", default_value = ".")]
    pub path: PathBuf,

    /// Keep running and regenerate whenever a service file is written
    #[arg(short, long)]
    pub watch: bool,

    /// Development build: omit the @definition introspection case
    #[arg(long)]
    pub dev: bool,

    /// Skip import normalization of the generated files
    #[arg(long = "no-format")]
    pub no_format: bool,

    /// Fail on duplicate record or method names
    #[arg(long)]
    pub strict: bool,

    /// Format of the definition documents
    #[arg(long = "definition-format", value_enum)]
    pub definition_format: Option<DefinitionFormat>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Install goimports with the Go toolchain before generating
    #[arg(long = "install-formatter")]
    pub install_formatter: bool,

    /// Write a .polycode.toml with default settings and exit
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing .polycode.toml when used with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}

impl Cli {
    /// Layer the command-line overrides on top of the file configuration
    pub fn apply_overrides(&self, mut config: GenConfig) -> GenConfig {
        if self.dev {
            config.production = false;
        }
        if self.no_format {
            config.format_imports = false;
        }
        if self.strict {
            config.strict_names = true;
        }
        if let Some(format) = self.definition_format {
            config.definition_format = format;
        }
        config
    }
}
