pub mod ast;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single named member of a record type.
///
/// `field_type` is the literal source text of the member's type expression.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }
}

/// Mapping from declared record type name to its ordered fields.
///
/// Built once per run by the record extractor and only read afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordSchema {
    records: HashMap<String, Vec<Field>>,
}

impl RecordSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the fields it replaced if the name was taken.
    pub(crate) fn insert(&mut self, name: String, fields: Vec<Field>) -> Option<Vec<Field>> {
        self.records.insert(name, fields)
    }

    pub fn get(&self, name: &str) -> Option<&[Field]> {
        self.records.get(name).map(Vec::as_slice)
    }

    /// Fields for a type reference as written at a call site (`pkg.Req`).
    ///
    /// Records are keyed by their bare declared name, so a qualified
    /// reference falls back to the part after the last `.`. Unknown types
    /// yield an empty schema.
    pub fn fields_for(&self, type_name: &str) -> Vec<Field> {
        self.get(type_name)
            .or_else(|| {
                type_name
                    .rsplit_once('.')
                    .and_then(|(_, bare)| self.get(bare))
            })
            .map(<[Field]>::to_vec)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(String, Vec<Field>)> for RecordSchema {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Field>)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Which context capability a convention function takes as its first parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextKind {
    Service,
    Workflow,
}

impl ContextKind {
    /// Map a capability type name (`ServiceContext`, `WorkflowContext`) to its kind
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "ServiceContext" => Some(Self::Service),
            "WorkflowContext" => Some(Self::Workflow),
            _ => None,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Service => "ServiceContext",
            Self::Workflow => "WorkflowContext",
        }
    }
}

/// One recognized, dispatchable function of a service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MethodRecord {
    pub original_name: String,
    #[serde(rename = "name")]
    pub normalized_name: String,
    #[serde(rename = "inputType")]
    pub input_type_name: String,
    #[serde(rename = "isInputPointer")]
    pub input_is_pointer: bool,
    pub input_schema: Vec<Field>,
    #[serde(rename = "outputType")]
    pub output_type_name: String,
    #[serde(rename = "isOutputPointer")]
    pub output_is_pointer: bool,
    pub output_schema: Vec<Field>,
    pub is_workflow: bool,
    pub is_service: bool,
}

/// A resolved parameter or result type: qualified name plus pointer flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub is_pointer: bool,
}

impl MethodRecord {
    pub fn new(
        original_name: impl Into<String>,
        kind: ContextKind,
        input: TypeRef,
        output: TypeRef,
        schema: &RecordSchema,
    ) -> Self {
        let original_name = original_name.into();
        Self {
            normalized_name: original_name.to_lowercase(),
            original_name,
            input_schema: schema.fields_for(&input.name),
            input_type_name: input.name,
            input_is_pointer: input.is_pointer,
            output_schema: schema.fields_for(&output.name),
            output_type_name: output.name,
            output_is_pointer: output.is_pointer,
            is_workflow: kind == ContextKind::Workflow,
            is_service: kind == ContextKind::Service,
        }
    }

    pub fn kind(&self) -> ContextKind {
        if self.is_workflow {
            ContextKind::Workflow
        } else {
            ContextKind::Service
        }
    }
}

/// Everything needed to render one service's artifacts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceModel {
    pub module_name: String,
    pub service_name: String,
    #[serde(rename = "serviceStructName")]
    pub struct_name: String,
    pub methods: Vec<MethodRecord>,
    pub imports: Vec<String>,
    pub is_production: bool,
}

impl ServiceModel {
    pub fn new(
        module_name: impl Into<String>,
        service_name: impl Into<String>,
        methods: Vec<MethodRecord>,
        imports: Vec<String>,
        is_production: bool,
    ) -> Self {
        let service_name = service_name.into();
        Self {
            module_name: module_name.into(),
            struct_name: to_pascal_case(&service_name),
            service_name,
            methods,
            imports,
            is_production,
        }
    }

    pub fn workflow_methods(&self) -> impl Iterator<Item = &MethodRecord> {
        self.methods.iter().filter(|m| m.kind() == ContextKind::Workflow)
    }

    pub fn service_methods(&self) -> impl Iterator<Item = &MethodRecord> {
        self.methods.iter().filter(|m| m.kind() == ContextKind::Service)
    }
}

/// Convert a hyphen-delimited service name to PascalCase.
///
/// Only the first character of each word is upper-cased; the rest of the
/// word is kept as written (`order-processing` -> `OrderProcessing`).
pub fn to_pascal_case(input: &str) -> String {
    input
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Remove duplicates while keeping the first occurrence of each item in place
pub fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_ref(name: &str, is_pointer: bool) -> TypeRef {
        TypeRef {
            name: name.to_string(),
            is_pointer,
        }
    }

    #[test]
    fn test_pascal_case_hyphenated() {
        assert_eq!(to_pascal_case("order-processing"), "OrderProcessing");
        assert_eq!(to_pascal_case("billing"), "Billing");
    }

    #[test]
    fn test_pascal_case_keeps_inner_case_and_skips_empty_words() {
        assert_eq!(to_pascal_case("user-APIs"), "UserAPIs");
        assert_eq!(to_pascal_case("a--b"), "AB");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_dedup_preserves_first_occurrence() {
        let imports = ["pkgA", "pkgB", "pkgA", "pkgA"]
            .into_iter()
            .map(String::from);
        assert_eq!(dedup_preserving_order(imports), vec!["pkgA", "pkgB"]);
    }

    #[test]
    fn test_method_record_normalizes_and_classifies() {
        let schema = RecordSchema::new();
        let record = MethodRecord::new(
            "DoThing",
            ContextKind::Workflow,
            type_ref("pkg.Req", true),
            type_ref("pkg.Resp", false),
            &schema,
        );

        assert_eq!(record.normalized_name, "dothing");
        assert_eq!(record.original_name, "DoThing");
        assert!(record.is_workflow);
        assert!(!record.is_service);
        assert_eq!(record.kind(), ContextKind::Workflow);
        assert!(record.input_schema.is_empty());
    }

    #[test]
    fn test_fields_for_falls_back_to_bare_name() {
        let schema: RecordSchema = [(
            "Req".to_string(),
            vec![Field::new("ID", "string"), Field::new("Count", "int")],
        )]
        .into_iter()
        .collect();

        assert_eq!(schema.fields_for("model.Req").len(), 2);
        assert_eq!(schema.fields_for("Req").len(), 2);
        assert!(schema.fields_for("model.Missing").is_empty());
    }

    #[test]
    fn test_context_kind_from_type_name() {
        assert_eq!(
            ContextKind::from_type_name("ServiceContext"),
            Some(ContextKind::Service)
        );
        assert_eq!(
            ContextKind::from_type_name("WorkflowContext"),
            Some(ContextKind::Workflow)
        );
        assert_eq!(ContextKind::from_type_name("Context"), None);
    }

    #[test]
    fn test_service_model_derives_struct_name() {
        let model = ServiceModel::new("example.com/app", "order-processing", vec![], vec![], true);
        assert_eq!(model.struct_name, "OrderProcessing");
        assert_eq!(model.workflow_methods().count(), 0);
    }

    #[test]
    fn test_service_model_splits_methods_by_context() {
        let schema = RecordSchema::new();
        let method = |name: &str, kind| {
            MethodRecord::new(name, kind, type_ref("pkg.Req", true), type_ref("pkg.Resp", true), &schema)
        };
        let model = ServiceModel::new(
            "example.com/app",
            "orders",
            vec![
                method("Create", ContextKind::Service),
                method("Fulfil", ContextKind::Workflow),
                method("Cancel", ContextKind::Service),
            ],
            vec![],
            true,
        );

        let services: Vec<&str> = model.service_methods().map(|m| m.original_name.as_str()).collect();
        let workflows: Vec<&str> = model.workflow_methods().map(|m| m.original_name.as_str()).collect();
        assert_eq!(services, vec!["Create", "Cancel"]);
        assert_eq!(workflows, vec!["Fulfil"]);
    }
}
