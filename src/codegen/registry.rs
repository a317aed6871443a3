//! Explicit registration entry point for all generated adapters.

use super::{is_go_identifier, ADAPTER_PACKAGE, GENERATED_HEADER};
use crate::errors::{GenError, Result};
use std::fmt::Write;

pub const REGISTRY_FILE: &str = "polycode_registry.go";

/// Render `RegisterServices()`, which registers each adapter in the given order.
pub fn render_registry(struct_names: &[String]) -> Result<String> {
    if let Some(bad) = struct_names.iter().find(|n| !is_go_identifier(n)) {
        return Err(GenError::render(
            bad.as_str(),
            "struct name is not a Go identifier",
        ));
    }

    let mut out = String::new();
    write_registry(&mut out, struct_names)
        .map_err(|_| GenError::render("registry", "failed to format registry source"))?;
    Ok(out)
}

fn write_registry(out: &mut String, struct_names: &[String]) -> std::fmt::Result {
    writeln!(out, "{GENERATED_HEADER}")?;
    writeln!(out)?;
    writeln!(out, "package {ADAPTER_PACKAGE}")?;
    writeln!(out)?;
    writeln!(
        out,
        "// RegisterServices publishes every generated service to the runtime registry."
    )?;
    writeln!(out, "// The hosting runtime calls it once before dispatching.")?;
    writeln!(out, "func RegisterServices() {{")?;
    for name in struct_names {
        writeln!(out, "\tRegister{name}()")?;
    }
    writeln!(out, "}}")
}
