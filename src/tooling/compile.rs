use crate::errors::{GenError, Result};
use std::path::Path;
use std::process::Command;

#[cfg(windows)]
const NULL_OUTPUT: &str = "NUL";
#[cfg(not(windows))]
const NULL_OUTPUT: &str = "/dev/null";

/// Check that a single Go file still builds, discarding the binary.
///
/// The error carries the trimmed compiler output.
pub fn check_file_compilable(path: &Path) -> Result<()> {
    let go = which::which("go").map_err(|e| GenError::Compile {
        path: path.to_path_buf(),
        output: format!("go toolchain not found: {e}"),
    })?;

    let output = Command::new(go)
        .args(["build", "-o", NULL_OUTPUT])
        .arg(path)
        .output()
        .map_err(|e| GenError::io(path, e))?;

    if output.status.success() {
        return Ok(());
    }

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Err(GenError::Compile {
        path: path.to_path_buf(),
        output: combined.trim().to_string(),
    })
}
