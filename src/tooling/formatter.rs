use crate::errors::{GenError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

pub const GOIMPORTS: &str = "goimports";
pub const GOIMPORTS_PACKAGE: &str = "golang.org/x/tools/cmd/goimports@latest";

/// Result of the post-generation import normalization step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatterOutcome {
    Formatted,
    Skipped(String),
    Failed(String),
}

/// Runs `goimports -w` over generated code to drop unused imports
#[derive(Debug, Clone)]
pub struct ImportFormatter {
    program: String,
}

impl Default for ImportFormatter {
    fn default() -> Self {
        Self::new(GOIMPORTS)
    }
}

impl ImportFormatter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve the formatter binary on `PATH`
    pub fn locate(&self) -> Option<PathBuf> {
        which::which(&self.program).ok()
    }

    pub fn is_available(&self) -> bool {
        self.locate().is_some()
    }

    /// Install goimports with `go install`
    pub fn install() -> Result<()> {
        let go = which::which("go")
            .map_err(|e| GenError::Formatter(format!("go toolchain not found: {e}")))?;

        info!("Installing {} with go install", GOIMPORTS);
        let output = Command::new(go)
            .args(["install", GOIMPORTS_PACKAGE])
            .output()
            .map_err(|e| GenError::Formatter(format!("failed to run go install: {e}")))?;

        if !output.status.success() {
            return Err(GenError::Formatter(format!(
                "go install {} failed: {}",
                GOIMPORTS_PACKAGE,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    /// Rewrite every Go file under `dir` in place
    pub fn run(&self, dir: &Path) -> Result<()> {
        let program = self
            .locate()
            .ok_or_else(|| GenError::Formatter(format!("{} not found in PATH", self.program)))?;

        debug!("Running {} -w {}", program.display(), dir.display());
        let output = Command::new(&program)
            .arg("-w")
            .arg(dir)
            .output()
            .map_err(|e| GenError::Formatter(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(GenError::Formatter(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    /// Run the formatter, folding a missing binary or failure into an outcome
    pub fn format_dir(&self, dir: &Path) -> FormatterOutcome {
        if !self.is_available() {
            return FormatterOutcome::Skipped(format!("{} not found in PATH", self.program));
        }
        match self.run(dir) {
            Ok(()) => FormatterOutcome::Formatted,
            Err(e) => FormatterOutcome::Failed(e.to_string()),
        }
    }
}
