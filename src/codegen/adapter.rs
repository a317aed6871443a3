//! Go adapter rendering.
//!
//! The adapter exposes the service name, per-method input allocation,
//! service and workflow executors, and a workflow predicate. Every switch is
//! emitted from the same method list in declaration order.

use super::{validate_model, RenderOptions, GENERATED_HEADER};
use crate::analyzers::GoParser;
use crate::core::{MethodRecord, ServiceModel};
use crate::errors::{GenError, Result};
use std::fmt::{self, Write};
use std::path::PathBuf;

/// Dispatch key answered with the ordered method list in production builds
pub const DEFINITION_REQUEST: &str = "@definition";

/// Render the adapter source for one service.
///
/// The output is re-parsed before it is returned, so callers never receive
/// a syntactically broken adapter.
pub fn render_adapter(model: &ServiceModel, options: &RenderOptions) -> Result<String> {
    validate_model(model)?;

    let mut writer = AdapterWriter::new(model, options);
    writer
        .write_all()
        .map_err(|_| GenError::render(&model.service_name, "failed to format adapter source"))?;
    let source = writer.finish();

    let file_name = format!("{}.go", model.service_name);
    GoParser::new()?
        .parse(source.clone(), PathBuf::from(file_name))
        .map_err(|e| {
            GenError::render(
                &model.service_name,
                format!("generated adapter is not valid Go: {e}"),
            )
        })?;

    Ok(source)
}

struct AdapterWriter<'a> {
    out: String,
    model: &'a ServiceModel,
    options: &'a RenderOptions,
}

impl<'a> AdapterWriter<'a> {
    fn new(model: &'a ServiceModel, options: &'a RenderOptions) -> Self {
        Self {
            out: String::new(),
            model,
            options,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn write_all(&mut self) -> fmt::Result {
        self.write_header()?;
        self.write_imports()?;
        self.write_registration()?;
        self.write_name()?;
        self.write_input_types()?;
        self.write_service_executor()?;
        self.write_workflow_executor()?;
        self.write_workflow_predicate()
    }

    fn write_header(&mut self) -> fmt::Result {
        writeln!(self.out, "{GENERATED_HEADER}")?;
        writeln!(self.out)?;
        writeln!(self.out, "package {}", super::ADAPTER_PACKAGE)?;
        writeln!(self.out)
    }

    fn write_imports(&mut self) -> fmt::Result {
        let service_import = format!(
            "{}/{}/{}",
            self.model.module_name, self.options.services_dir, self.model.service_name
        );
        let reserved = [
            "errors",
            "strings",
            self.options.sdk_import.as_str(),
            service_import.as_str(),
        ];

        writeln!(self.out, "import (")?;
        writeln!(self.out, "\t\"errors\"")?;
        writeln!(self.out, "\t\"strings\"")?;
        writeln!(self.out)?;
        writeln!(self.out, "\t\"{}\"", self.options.sdk_import)?;
        writeln!(self.out, "\tservice \"{service_import}\"")?;
        for import in &self.model.imports {
            if !reserved.contains(&import.as_str()) {
                writeln!(self.out, "\t\"{import}\"")?;
            }
        }
        writeln!(self.out, ")")?;
        writeln!(self.out)
    }

    fn write_registration(&mut self) -> fmt::Result {
        let model = self.model;
        let ctx = self.options.context_package.as_str();
        let name = &model.struct_name;
        writeln!(
            self.out,
            "// Register{name} publishes the {} service to the runtime registry.",
            model.service_name
        )?;
        writeln!(self.out, "func Register{name}() {{")?;
        writeln!(self.out, "\t{ctx}.RegisterService(&{name}{{}})")?;
        writeln!(self.out, "}}")?;
        writeln!(self.out)?;
        writeln!(self.out, "type {name} struct {{")?;
        writeln!(self.out, "}}")?;
        writeln!(self.out)
    }

    fn write_name(&mut self) -> fmt::Result {
        writeln!(
            self.out,
            "func (t *{}) GetName() string {{",
            self.model.struct_name
        )?;
        writeln!(self.out, "\treturn \"{}\"", self.model.service_name)?;
        writeln!(self.out, "}}")?;
        writeln!(self.out)
    }

    fn write_input_types(&mut self) -> fmt::Result {
        writeln!(
            self.out,
            "func (t *{}) GetInputType(method string) (any, error) {{",
            self.model.struct_name
        )?;
        writeln!(self.out, "\tmethod = strings.ToLower(method)")?;
        writeln!(self.out, "\tswitch method {{")?;
        for method in &self.model.methods {
            writeln!(self.out, "\tcase \"{}\":", method.normalized_name)?;
            writeln!(self.out, "\t\treturn &{}{{}}, nil", method.input_type_name)?;
        }
        self.write_not_found()?;
        writeln!(self.out, "}}")?;
        writeln!(self.out)
    }

    fn write_service_executor(&mut self) -> fmt::Result {
        let model = self.model;
        let ctx = self.options.context_package.as_str();
        writeln!(
            self.out,
            "// ExecuteService dispatches methods taking {}.ServiceContext.",
            ctx
        )?;
        writeln!(
            self.out,
            "func (t *{}) ExecuteService(ctx {}.ServiceContext, method string, input any) (any, error) {{",
            self.model.struct_name,
            ctx
        )?;
        writeln!(self.out, "\tmethod = strings.ToLower(method)")?;

        if self.model.is_production {
            writeln!(self.out)?;
            writeln!(self.out, "\tif method == \"{DEFINITION_REQUEST}\" {{")?;
            writeln!(self.out, "\t\treturn []string{{")?;
            for method in &self.model.methods {
                writeln!(self.out, "\t\t\t\"{}\",", method.original_name)?;
            }
            writeln!(self.out, "\t\t}}, nil")?;
            writeln!(self.out, "\t}}")?;
            writeln!(self.out)?;
        }

        let methods: Vec<&MethodRecord> = model.service_methods().collect();
        self.write_dispatch(&methods)
    }

    fn write_workflow_executor(&mut self) -> fmt::Result {
        let model = self.model;
        let ctx = self.options.context_package.as_str();
        writeln!(
            self.out,
            "// ExecuteWorkflow dispatches methods taking {}.WorkflowContext.",
            ctx
        )?;
        writeln!(
            self.out,
            "func (t *{}) ExecuteWorkflow(ctx {}.WorkflowContext, method string, input any) (any, error) {{",
            self.model.struct_name,
            ctx
        )?;
        writeln!(self.out, "\tmethod = strings.ToLower(method)")?;

        let methods: Vec<&MethodRecord> = model.workflow_methods().collect();
        self.write_dispatch(&methods)
    }

    fn write_dispatch(&mut self, methods: &[&MethodRecord]) -> fmt::Result {
        writeln!(self.out, "\tswitch method {{")?;
        for method in methods {
            writeln!(self.out, "\tcase \"{}\":", method.normalized_name)?;
            if method.input_is_pointer {
                writeln!(
                    self.out,
                    "\t\treturn service.{}(ctx, input.(*{}))",
                    method.original_name, method.input_type_name
                )?;
            } else {
                writeln!(
                    self.out,
                    "\t\treturn service.{}(ctx, *(input.(*{})))",
                    method.original_name, method.input_type_name
                )?;
            }
        }
        self.write_not_found()?;
        writeln!(self.out, "}}")?;
        writeln!(self.out)
    }

    fn write_workflow_predicate(&mut self) -> fmt::Result {
        let model = self.model;
        let ctx = self.options.context_package.as_str();
        writeln!(
            self.out,
            "// IsWorkflow reports whether the method takes {}.WorkflowContext.",
            ctx
        )?;
        writeln!(
            self.out,
            "func (t *{}) IsWorkflow(method string) bool {{",
            self.model.struct_name
        )?;
        writeln!(self.out, "\tmethod = strings.ToLower(method)")?;
        writeln!(self.out, "\tswitch method {{")?;
        for method in model.workflow_methods() {
            writeln!(self.out, "\tcase \"{}\":", method.normalized_name)?;
            writeln!(self.out, "\t\treturn true")?;
        }
        writeln!(self.out, "\t}}")?;
        writeln!(self.out, "\treturn false")?;
        writeln!(self.out, "}}")
    }

    fn write_not_found(&mut self) -> fmt::Result {
        writeln!(self.out, "\tdefault:")?;
        writeln!(self.out, "\t\treturn nil, errors.New(\"method not found\")")?;
        writeln!(self.out, "\t}}")
    }
}
