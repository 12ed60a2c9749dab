use openapi_assembler::{
    config::{Options, ProjectMetadata},
    document::OpenApiDocument,
    introspection::Snapshot,
    openapi_builder::{assemble, Assembly, Diagnostic},
    serializer::{serialize_json, serialize_yaml},
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::path::Path;

const SHOP_SNAPSHOT: &str = include_str!("fixtures/shop_snapshot.json");

fn shop_snapshot() -> Snapshot {
    serde_json::from_str(SHOP_SNAPSHOT).expect("Failed to parse shop snapshot fixture")
}

fn assemble_shop() -> Assembly {
    assemble(&shop_snapshot(), &Options::default(), &ProjectMetadata::default())
}

fn operation_ids(document: &OpenApiDocument) -> Vec<&str> {
    document
        .operations()
        .map(|operation| operation.operation_id.as_str())
        .collect()
}

#[test]
fn test_shop_end_to_end_assembly() {
    let assembly = assemble_shop();
    let document = &assembly.document;

    let paths: Vec<_> = document.paths.keys().map(String::as_str).collect();
    assert_eq!(
        paths,
        vec![
            "/accounts/login",
            "/accounts/logout",
            "/orders",
            "/widgets",
            "/widgets/count",
            "/widgets/replaceOrCreate",
            "/widgets/{id}",
        ]
    );

    let widgets = &document.paths["/widgets"];
    assert!(widgets.get.is_some());
    assert!(widgets.post.is_some());
    assert!(widgets.put.is_some());
    // Undocumented route never reaches the document
    assert!(document.paths["/widgets/{id}"].delete.is_none());

    let schemas: Vec<_> = document.components.schemas.keys().map(String::as_str).collect();
    assert_eq!(
        schemas,
        vec!["Account", "Account_2", "Credentials", "Order", "OrderLine", "Widget"]
    );

    let tags: Vec<_> = document.tags.iter().map(|tag| tag.name.as_str()).collect();
    assert_eq!(tags, vec!["Account", "Order", "Widget"]);
    assert_eq!(
        document.tags[0].description.as_deref(),
        Some("Customer accounts\nand sessions")
    );
}

#[test]
fn test_shop_orphan_routes_are_diagnosed() {
    let assembly = assemble_shop();

    let orphans: Vec<_> = assembly
        .diagnostics
        .iter()
        .filter_map(|diagnostic| match diagnostic {
            Diagnostic::OrphanRoute { class_name, .. } => Some(class_name.as_str()),
            _ => None,
        })
        .collect();

    assert_eq!(orphans, vec!["Internal", "Ghost"]);
    assert!(!assembly.document.paths.contains_key("/internal/sync"));
    assert!(!assembly.document.paths.contains_key("/ghosts"));
    assert_eq!(assembly.diagnostics.len(), 2);
}

#[test]
fn test_shop_operation_ids_are_unique() {
    let assembly = assemble_shop();
    let ids = operation_ids(&assembly.document);
    let unique: HashSet<_> = ids.iter().collect();

    assert_eq!(ids.len(), unique.len(), "duplicate operation ids: {ids:?}");
    assert!(ids.contains(&"Widget.replaceOrCreate"));
    assert!(ids.contains(&"Widget.replaceOrCreate_2"));
    assert!(ids.contains(&"Widget.findById"));
}

#[test]
fn test_shop_tags_are_exactly_the_used_ones() {
    let assembly = assemble_shop();
    let document = &assembly.document;

    let used: HashSet<&str> = document
        .operations()
        .flat_map(|operation| operation.tags.iter().map(String::as_str))
        .collect();
    let declared: Vec<&str> = document.tags.iter().map(|tag| tag.name.as_str()).collect();
    let declared_set: HashSet<&str> = declared.iter().copied().collect();

    assert_eq!(used, declared_set);
    assert_eq!(declared.len(), declared_set.len(), "tags listed more than once");
}

#[test]
fn test_shop_schema_references_resolve() {
    let assembly = assemble_shop();
    let json = serialize_json(&assembly.document).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let widget = &value["components"]["schemas"]["Widget"];
    assert_eq!(widget["properties"]["owner"]["$ref"], "#/components/schemas/Account");
    assert_eq!(widget["properties"]["createdAt"]["format"], "date-time");
    assert_eq!(widget["properties"]["price"]["default"], 0);
    assert!(widget["properties"].get("secret").is_none());
    assert_eq!(widget["additionalProperties"], false);
    assert_eq!(widget["required"], serde_json::json!(["id", "name"]));

    let order_lines = &value["components"]["schemas"]["Order"]["properties"]["lines"];
    assert_eq!(order_lines["type"], "array");
    assert_eq!(order_lines["items"]["$ref"], "#/components/schemas/OrderLine");

    let login = &value["paths"]["/accounts/login"]["post"];
    assert_eq!(
        login["requestBody"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/Credentials"
    );
    assert_eq!(
        login["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/Account_2"
    );
    assert_eq!(
        value["paths"]["/accounts/logout"]["post"]["responses"]["204"]["description"],
        "Request was successful, no content."
    );
}

#[test]
fn test_shop_parameters() {
    let assembly = assemble_shop();
    let document = &assembly.document;

    let find_by_id = document.paths["/widgets/{id}"].get.as_ref().unwrap();
    assert_eq!(find_by_id.parameters.len(), 1);
    assert_eq!(find_by_id.parameters[0].name, "id");
    assert!(find_by_id.parameters[0].required);

    let find = document.paths["/widgets"].get.as_ref().unwrap();
    assert_eq!(find.summary.as_deref(), Some("Find all widgets"));
    assert_eq!(
        find.parameters[0].description.as_deref(),
        Some("Filter defining fields,\nwhere and order")
    );
}

#[test]
fn test_assembly_is_deterministic() {
    let first = serialize_json(&assemble_shop().document).unwrap();
    let second = serialize_json(&assemble_shop().document).unwrap();
    assert_eq!(first, second);

    let first_yaml = serialize_yaml(&assemble_shop().document).unwrap();
    let second_yaml = serialize_yaml(&assemble_shop().document).unwrap();
    assert_eq!(first_yaml, second_yaml);
}

#[test]
fn test_assembly_ignores_class_input_order() {
    let baseline = serialize_json(&assemble_shop().document).unwrap();

    let mut shuffled = shop_snapshot();
    shuffled.classes.reverse();
    let reordered = serialize_json(
        &assemble(&shuffled, &Options::default(), &ProjectMetadata::default()).document,
    )
    .unwrap();

    assert_eq!(baseline, reordered);
}

#[test]
fn test_assembly_ignores_model_order_in_snapshot_file() {
    const ACCOUNT_FIRST: &str = r#"{
        "models": {
            "Account": { "name": "Account", "properties": { "id": { "type": "string" } } },
            "LegacyAccount": { "name": "Account", "properties": { "login": { "type": "string" } } },
            "Holder": { "name": "Holder", "properties": { "account": { "type": "Account" } } }
        }
    }"#;
    const HOLDER_FIRST: &str = r#"{
        "models": {
            "Holder": { "name": "Holder", "properties": { "account": { "type": "Account" } } },
            "LegacyAccount": { "name": "Account", "properties": { "login": { "type": "string" } } },
            "Account": { "name": "Account", "properties": { "id": { "type": "string" } } }
        }
    }"#;

    let render = |json: &str| {
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        serialize_json(
            &assemble(&snapshot, &Options::default(), &ProjectMetadata::default()).document,
        )
        .unwrap()
    };

    let first = render(ACCOUNT_FIRST);
    assert_eq!(first, render(HOLDER_FIRST));

    let value: serde_json::Value = serde_json::from_str(&first).unwrap();
    let schemas = &value["components"]["schemas"];
    assert!(schemas["Account"]["properties"]["id"].is_object());
    assert!(schemas["Account_2"]["properties"]["login"].is_object());
}

#[test]
fn test_snapshot_loads_from_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop_snapshot.json");
    let snapshot = Snapshot::from_path(&path).expect("Failed to load snapshot from file");

    assert_eq!(snapshot.routes.len(), 13);
    assert_eq!(snapshot.classes.len(), 6);
    assert_eq!(snapshot.models.len(), 4);
    assert_eq!(snapshot.routes[2].class_name, "Widget");
    assert_eq!(snapshot.routes[2].method_name, "findById");
}

#[test]
fn test_yaml_output_shape() {
    let yaml = serialize_yaml(&assemble_shop().document).unwrap();

    assert!(yaml.contains("openapi: 3.0.0") || yaml.contains("openapi: '3.0.0'"));
    assert!(yaml.contains("url: /api"));
    assert!(yaml.contains("/widgets/{id}"));
    assert!(yaml.contains("securitySchemes:"));
    assert!(yaml.contains("operationId: Widget.findById"));
}
