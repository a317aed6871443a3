//! Error types for the generation pipeline.
//!
//! Every fatal condition surfaces as a [`GenError`] carrying enough context
//! (file path, function name, service name) to diagnose it. Shape mismatches
//! on a function's input or output are not errors; such functions are dropped
//! by the convention parser.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for generation operations
#[derive(Debug, Error)]
pub enum GenError {
    /// The project manifest is missing or does not declare a module
    #[error("Manifest error in {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    /// File system related errors
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file could not be parsed into a syntax tree
    #[error("Parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A convention function has an invalid signature
    #[error("{}: function {function}: {message}", path.display())]
    Convention {
        path: PathBuf,
        function: String,
        message: String,
    },

    /// Two functions of one service normalize to the same dispatch key
    #[error("{}: function {function} collides with {previous} on method name {name:?}", path.display())]
    DuplicateMethod {
        path: PathBuf,
        function: String,
        previous: String,
        name: String,
    },

    /// Two record types share one name across the project
    #[error("{}: record type {name} is already declared in {}", path.display(), previous.display())]
    DuplicateRecord {
        path: PathBuf,
        previous: PathBuf,
        name: String,
    },

    /// Adapter or definition rendering failed
    #[error("Render error for service {service}: {message}")]
    Render { service: String, message: String },

    /// Configuration file errors
    #[error("Configuration error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// The import formatter is missing or failed
    #[error("Import formatter error: {0}")]
    Formatter(String),

    /// A watched file failed the compile check
    #[error("Compilation error in {}: {output}", path.display())]
    Compile { path: PathBuf, output: String },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Language(#[from] tree_sitter::LanguageError),

    #[error(transparent)]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    ShutdownHandler(#[from] ctrlc::Error),
}

impl GenError {
    /// Create an I/O error with path context
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a parse error with path context
    pub fn parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a convention error naming the offending function
    pub fn convention(
        path: impl AsRef<Path>,
        function: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Convention {
            path: path.as_ref().to_path_buf(),
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn render(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Whether the error came from reading or parsing user source code.
    ///
    /// The watcher uses this to keep running after a bad edit.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. }
                | Self::Convention { .. }
                | Self::DuplicateMethod { .. }
                | Self::DuplicateRecord { .. }
                | Self::Compile { .. }
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, GenError>;

/// Extension trait for attaching a path to raw I/O results
pub trait IoResultExt<T> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| GenError::io(path, e))
    }
}
