//! Wrappers around the Go toolchain binaries the generator shells out to.

mod compile;
mod formatter;

pub use compile::check_file_compilable;
pub use formatter::{FormatterOutcome, ImportFormatter, GOIMPORTS, GOIMPORTS_PACKAGE};
