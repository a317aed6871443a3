mod common;

use common::{GoProject, MODULE, ORDERS_SOURCE};
use indoc::indoc;
use polycode_gen::tooling::FormatterOutcome;
use polycode_gen::{
    generate_services, DefinitionFormat, Field, GenConfig, GenError, ServiceModel,
};
use pretty_assertions::assert_eq;

const EXPECTED_ORDERS_ADAPTER: &str = indoc! {r#"
    // Code generated by polycode-gen. DO NOT EDIT.

    package _polycode

    import (
    	"errors"
    	"strings"

    	"github.com/cloudimpl/next-coder-sdk/polycode"
    	service "example.com/shop/services/orders"
    	"example.com/shop/model"
    )

    // RegisterOrders publishes the orders service to the runtime registry.
    func RegisterOrders() {
    	polycode.RegisterService(&Orders{})
    }

    type Orders struct {
    }

    func (t *Orders) GetName() string {
    	return "orders"
    }

    func (t *Orders) GetInputType(method string) (any, error) {
    	method = strings.ToLower(method)
    	switch method {
    	case "createorder":
    		return &model.OrderRequest{}, nil
    	case "shiporder":
    		return &model.OrderRequest{}, nil
    	default:
    		return nil, errors.New("method not found")
    	}
    }

    // ExecuteService dispatches methods taking polycode.ServiceContext.
    func (t *Orders) ExecuteService(ctx polycode.ServiceContext, method string, input any) (any, error) {
    	method = strings.ToLower(method)

    	if method == "@definition" {
    		return []string{
    			"CreateOrder",
    			"ShipOrder",
    		}, nil
    	}

    	switch method {
    	case "createorder":
    		return service.CreateOrder(ctx, input.(*model.OrderRequest))
    	default:
    		return nil, errors.New("method not found")
    	}
    }

    // ExecuteWorkflow dispatches methods taking polycode.WorkflowContext.
    func (t *Orders) ExecuteWorkflow(ctx polycode.WorkflowContext, method string, input any) (any, error) {
    	method = strings.ToLower(method)
    	switch method {
    	case "shiporder":
    		return service.ShipOrder(ctx, *(input.(*model.OrderRequest)))
    	default:
    		return nil, errors.New("method not found")
    	}
    }

    // IsWorkflow reports whether the method takes polycode.WorkflowContext.
    func (t *Orders) IsWorkflow(method string) bool {
    	method = strings.ToLower(method)
    	switch method {
    	case "shiporder":
    		return true
    	}
    	return false
    }
"#};

#[test]
fn test_generates_adapter_definition_and_registry() {
    let project = GoProject::with_orders();
    let report = generate_services(&project.options()).unwrap();

    assert_eq!(report.module_name, MODULE);
    assert_eq!(report.generated.len(), 1);
    assert!(report.skipped.is_empty());
    let orders = &report.generated[0];
    assert_eq!(orders.service_name, "orders");
    assert_eq!(orders.struct_name, "Orders");
    assert_eq!(orders.method_count, 2);
    assert_eq!(orders.adapter_path, project.path(".polycode/orders.go"));
    assert_eq!(
        orders.definition_path,
        project.path(".polycode/definition/orders.yml")
    );
    assert_eq!(
        report.formatter,
        FormatterOutcome::Skipped("import formatting disabled".to_string())
    );

    assert_eq!(project.read(".polycode/orders.go"), EXPECTED_ORDERS_ADAPTER);
    assert_eq!(
        report.registry_path,
        Some(project.path(".polycode/polycode_registry.go"))
    );
    assert!(project
        .read(".polycode/polycode_registry.go")
        .contains("\tRegisterOrders()\n"));
}

#[test]
fn test_definition_carries_record_schemas() {
    let project = GoProject::with_orders();
    generate_services(&project.options()).unwrap();

    let model: ServiceModel =
        serde_yaml::from_str(&project.read(".polycode/definition/orders.yml")).unwrap();
    assert_eq!(model.module_name, MODULE);
    assert_eq!(model.struct_name, "Orders");
    assert!(model.is_production);

    let create = &model.methods[0];
    assert_eq!(create.original_name, "CreateOrder");
    assert_eq!(create.normalized_name, "createorder");
    assert!(create.is_service && !create.is_workflow);
    assert!(create.input_is_pointer && create.output_is_pointer);
    assert_eq!(
        create.input_schema,
        vec![Field::new("ID", "string"), Field::new("Quantity", "int")]
    );
    assert_eq!(create.output_schema, vec![Field::new("Status", "string")]);

    let ship = &model.methods[1];
    assert!(ship.is_workflow && !ship.is_service);
    assert!(!ship.input_is_pointer && !ship.output_is_pointer);
}

#[test]
fn test_json_definition_format() {
    let project = GoProject::with_orders();
    let config = GenConfig {
        definition_format: DefinitionFormat::Json,
        ..GenConfig::default()
    };
    let report = generate_services(&project.options_with(config)).unwrap();

    assert_eq!(
        report.generated[0].definition_path,
        project.path(".polycode/definition/orders.json")
    );
    let model: ServiceModel =
        serde_json::from_str(&project.read(".polycode/definition/orders.json")).unwrap();
    assert_eq!(model.methods.len(), 2);
    assert!(!project.exists(".polycode/definition/orders.yml"));
}

#[test]
fn test_development_build_omits_introspection() {
    let project = GoProject::with_orders();
    generate_services(&project.options().with_production(false)).unwrap();

    let adapter = project.read(".polycode/orders.go");
    assert!(!adapter.contains("@definition"));
    assert!(adapter.contains("case \"createorder\":"));
}

#[test]
fn test_service_without_methods_writes_nothing() {
    let project = GoProject::new();
    project.write(
        "services/helpers/helpers.go",
        indoc! {r#"
            package helpers

            func normalize(s string) string {
                return s
            }
        "#},
    );

    let report = generate_services(&project.options()).unwrap();

    assert!(report.generated.is_empty());
    assert_eq!(report.skipped, vec!["helpers".to_string()]);
    assert_eq!(report.registry_path, None);
    assert!(!project.exists(".polycode/helpers.go"));
    assert!(!project.exists(".polycode/definition/helpers.yml"));
}

#[test]
fn test_missing_services_directory_is_not_an_error() {
    let project = GoProject::new();
    let report = generate_services(&project.options()).unwrap();

    assert!(report.generated.is_empty());
    assert!(report.skipped.is_empty());
    assert!(!project.exists(".polycode"));
}

#[test]
fn test_regeneration_is_byte_identical() {
    let project = GoProject::with_orders();
    project.write(
        "services/billing-account/billing.go",
        indoc! {r#"
            package billing

            import (
                "example.com/shop/model"
                "github.com/cloudimpl/next-coder-sdk/polycode"
            )

            func Charge(ctx polycode.ServiceContext, req model.OrderRequest) (*model.OrderResponse, error) {
                return nil, nil
            }
        "#},
    );
    let artifacts = [
        ".polycode/orders.go",
        ".polycode/billing-account.go",
        ".polycode/definition/orders.yml",
        ".polycode/definition/billing-account.yml",
        ".polycode/polycode_registry.go",
    ];

    generate_services(&project.options()).unwrap();
    let first: Vec<String> = artifacts.iter().map(|a| project.read(a)).collect();
    generate_services(&project.options()).unwrap();
    let second: Vec<String> = artifacts.iter().map(|a| project.read(a)).collect();

    assert_eq!(first, second);
    assert!(first[4].find("RegisterBillingAccount()") < first[4].find("RegisterOrders()"));
}

#[test]
fn test_imports_are_deduplicated_across_files() {
    let project = GoProject::with_orders();
    project.write(
        "services/orders/refunds.go",
        indoc! {r#"
            package orders

            import (
                "example.com/shop/model"
                "github.com/cloudimpl/next-coder-sdk/polycode"
            )

            func RefundOrder(ctx polycode.ServiceContext, req *model.OrderRequest) (*model.OrderResponse, error) {
                return nil, nil
            }
        "#},
    );

    generate_services(&project.options()).unwrap();
    let adapter = project.read(".polycode/orders.go");

    assert_eq!(adapter.matches("\"example.com/shop/model\"").count(), 1);
    assert_eq!(
        adapter
            .matches("\"github.com/cloudimpl/next-coder-sdk/polycode\"")
            .count(),
        1
    );
    assert!(adapter.contains("return service.RefundOrder(ctx, input.(*model.OrderRequest))"));
}

#[test]
fn test_test_files_are_ignored() {
    let project = GoProject::with_orders();
    project.write(
        "services/orders/orders_test.go",
        indoc! {r#"
            package orders

            func TestCreateOrder(t *testing.T) {}
        "#},
    );

    let report = generate_services(&project.options()).unwrap();
    assert_eq!(report.generated[0].method_count, 2);
}

#[test]
fn test_missing_manifest_is_fatal() {
    let project = GoProject::with_orders();
    std::fs::remove_file(project.path("go.mod")).unwrap();

    let err = generate_services(&project.options()).unwrap_err();
    assert!(matches!(err, GenError::Manifest { .. }));
    assert!(!project.exists(".polycode"));
}

#[test]
fn test_manifest_without_module_is_fatal() {
    let project = GoProject::with_orders();
    project.write("go.mod", "go 1.22\n");

    let err = generate_services(&project.options()).unwrap_err();
    assert!(matches!(err, GenError::Manifest { .. }));
}

#[test]
fn test_unparsable_service_aborts_the_run() {
    let project = GoProject::with_orders();
    project.write(
        "services/broken/broken.go",
        "package broken\n\nfunc Oops(ctx polycode.ServiceContext {\n",
    );

    let err = generate_services(&project.options()).unwrap_err();
    assert!(matches!(err, GenError::Parse { .. }), "{err}");
    // "broken" sorts before "orders", so nothing was written
    assert!(!project.exists(".polycode/orders.go"));
}

#[test]
fn test_wrong_context_parameter_names_the_function() {
    let project = GoProject::with_orders();
    project.write(
        "services/orders/admin.go",
        indoc! {r#"
            package orders

            import "example.com/shop/model"

            func Purge(name string, req *model.OrderRequest) (*model.OrderResponse, error) {
                return nil, nil
            }
        "#},
    );

    let err = generate_services(&project.options()).unwrap_err();
    match err {
        GenError::Convention { function, path, .. } => {
            assert_eq!(function, "Purge");
            assert!(path.ends_with("admin.go"));
        }
        other => panic!("expected convention error, got {other}"),
    }
}

#[test]
fn test_colliding_method_names_keep_the_last_definition() {
    let project = GoProject::with_orders();
    project.write(
        "services/orders/zz_override.go",
        indoc! {r#"
            package orders

            import (
                "example.com/shop/model"
                "github.com/cloudimpl/next-coder-sdk/polycode"
            )

            func CREATEORDER(ctx polycode.WorkflowContext, req *model.OrderRequest) (*model.OrderResponse, error) {
                return nil, nil
            }
        "#},
    );

    let report = generate_services(&project.options()).unwrap();
    assert_eq!(report.generated[0].method_count, 2);

    let adapter = project.read(".polycode/orders.go");
    // input lookup, workflow executor and workflow predicate; no service case
    assert_eq!(adapter.matches("case \"createorder\":").count(), 3);
    assert!(adapter.contains("return service.CREATEORDER(ctx, input.(*model.OrderRequest))"));
    assert!(!adapter.contains("service.CreateOrder("));

    let strict = GenConfig {
        strict_names: true,
        ..GenConfig::default()
    };
    let err = generate_services(&project.options_with(strict)).unwrap_err();
    assert!(matches!(err, GenError::DuplicateMethod { .. }));
}

#[test]
fn test_unsupported_shapes_are_dropped_silently() {
    let project = GoProject::new();
    project.write("services/orders/orders.go", ORDERS_SOURCE);
    project.write(
        "services/orders/extra.go",
        indoc! {r#"
            package orders

            import "github.com/cloudimpl/next-coder-sdk/polycode"

            func Ping(ctx polycode.ServiceContext, msg string) (string, error) {
                return msg, nil
            }
        "#},
    );

    let report = generate_services(&project.options()).unwrap();
    assert_eq!(report.generated[0].method_count, 2);
    assert!(!project.read(".polycode/orders.go").contains("Ping"));
}

#[test]
fn test_visible_output_dir_is_not_read_back_as_records() {
    let project = GoProject::new();
    project.write(
        "services/order-request/api.go",
        indoc! {r#"
            package orderrequest

            import (
                "example.com/shop/model"
                "github.com/cloudimpl/next-coder-sdk/polycode"
            )

            func Submit(ctx polycode.ServiceContext, req *model.OrderRequest) (*model.OrderResponse, error) {
                return nil, nil
            }
        "#},
    );
    let config = GenConfig {
        output_dir: "zz_gen".to_string(),
        strict_names: true,
        ..GenConfig::default()
    };

    generate_services(&project.options_with(config.clone())).unwrap();
    let first = project.read("zz_gen/definition/order-request.yml");
    // The adapter declares `type OrderRequest struct`, same name as the model record
    assert!(project.read("zz_gen/order-request.go").contains("type OrderRequest struct"));

    generate_services(&project.options_with(config)).unwrap();
    let second = project.read("zz_gen/definition/order-request.yml");

    assert_eq!(first, second);
    let model: ServiceModel = serde_yaml::from_str(&second).unwrap();
    assert_eq!(
        model.methods[0].input_schema,
        vec![Field::new("ID", "string"), Field::new("Quantity", "int")]
    );
}
