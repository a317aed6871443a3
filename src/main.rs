use anyhow::{Context, Result};
use clap::Parser;
use polycode_gen::cli::{setup, Cli};
use polycode_gen::commands::{generate_services, init_config, watch_services, GenerateOptions};
use polycode_gen::config::load_config;
use polycode_gen::tooling::{FormatterOutcome, ImportFormatter};
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup::init_logging(cli.verbosity)?;

    if cli.init {
        init_config(&cli.path, cli.force)?;
        return Ok(());
    }

    let config = cli.apply_overrides(load_config(&cli.path));

    if cli.install_formatter && config.format_imports {
        install_formatter();
    }

    if !cli.path.is_dir() {
        anyhow::bail!("project path does not exist: {}", cli.path.display());
    }
    let options = GenerateOptions::new(cli.path.clone()).with_config(config);

    if cli.watch {
        // A broken tree at startup is reported; the watcher picks up the fix
        if let Err(e) = run_generation(&options) {
            error!("{:#}", e);
        }
        watch_services(&options).context("watch mode stopped with an error")?;
    } else {
        run_generation(&options)?;
    }

    Ok(())
}

fn run_generation(options: &GenerateOptions) -> Result<()> {
    let report = generate_services(options)
        .with_context(|| format!("generation failed for {}", options.root.display()))?;
    if let FormatterOutcome::Failed(message) = &report.formatter {
        warn!("Generated files were not formatted: {}", message);
    }
    Ok(())
}

// Installation failure is not fatal; generation proceeds without formatting
fn install_formatter() {
    let formatter = ImportFormatter::default();
    if formatter.is_available() {
        info!("goimports already installed");
        return;
    }
    if let Err(e) = ImportFormatter::install() {
        warn!("Failed to install goimports: {}", e);
    }
}
