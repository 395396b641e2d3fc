use indexmap::IndexMap;
use mschema::{FieldSpec, MSchema, SchemaError};
use serde_json::json;

fn populated() -> MSchema {
    let mut schema = MSchema::new("shop", Some("public".to_string()));
    // Deliberately not alphabetical, to catch order loss.
    schema.add_table("orders", IndexMap::new(), Some("Customer orders".to_string()));
    schema.add_table("customers", IndexMap::new(), None);
    schema.add_table("audit", IndexMap::new(), Some(String::new()));

    schema
        .add_field(
            "orders",
            "id",
            FieldSpec::new("INTEGER").primary_key().not_null().autoincrement(true),
        )
        .unwrap();
    schema
        .add_field(
            "orders",
            "status",
            FieldSpec::new("VARCHAR(16)")
                .default_value("pending")
                .comment("Lifecycle state")
                .examples(["pending", "paid", "shipped"]),
        )
        .unwrap();
    schema
        .add_field("orders", "customer_id", FieldSpec::new("INTEGER").default_value(0))
        .unwrap();
    schema
        .add_field("customers", "zip", FieldSpec::new("TEXT").default_value("None"))
        .unwrap();
    schema
        .add_field("customers", "id", FieldSpec::new("INTEGER").primary_key())
        .unwrap();

    schema.add_foreign_key("orders", "customer_id", "public", "customers", "id");
    schema.add_foreign_key("orders", "customer_id", "public", "customers", "id");
    schema.add_foreign_key("audit", "order_id", "archive", "orders_old", "id");
    schema
}

fn table_names(schema: &MSchema) -> Vec<String> {
    schema.tables().keys().cloned().collect()
}

fn field_names(schema: &MSchema, table: &str) -> Vec<String> {
    schema.table(table).unwrap().fields.keys().cloned().collect()
}

#[test]
fn test_round_trip_preserves_state_and_order() {
    let original = populated();
    let mut reloaded = MSchema::default();
    reloaded.load(original.dump().unwrap()).unwrap();

    assert_eq!(reloaded, original);
    assert_eq!(table_names(&reloaded), vec!["orders", "customers", "audit"]);
    assert_eq!(field_names(&reloaded, "orders"), vec!["id", "status", "customer_id"]);
    assert_eq!(field_names(&reloaded, "customers"), vec!["zip", "id"]);
    assert_eq!(reloaded.foreign_keys(), original.foreign_keys());
    assert_eq!(
        reloaded.field_info("customers", "zip").unwrap().default.as_deref(),
        Some("None")
    );
}

#[test]
fn test_round_trip_with_empty_id_and_namespace() {
    let original = MSchema::new("", Some(String::new()));
    assert_eq!(original.db_id(), "Anonymous");
    assert_eq!(original.namespace(), None);

    let mut reloaded = MSchema::new("other", Some("public".to_string()));
    reloaded.load(original.dump().unwrap()).unwrap();
    assert_eq!(reloaded, original);
    assert_eq!(reloaded.to_mschema(), original.to_mschema());
}

#[test]
fn test_round_trip_through_json_file() {
    let original = populated();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.json");

    std::fs::write(&path, original.to_json_pretty().unwrap()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let reloaded = MSchema::from_json_str(&text).unwrap();

    assert_eq!(reloaded, original);
    assert_eq!(table_names(&reloaded), table_names(&original));
    assert_eq!(reloaded.to_mschema(), original.to_mschema());
}

#[test]
fn test_dump_is_lossless() {
    let doc = populated().dump().unwrap();

    assert_eq!(doc["db_id"], json!("shop"));
    assert_eq!(doc["schema"], json!("public"));
    // No type simplification in the document form.
    assert_eq!(doc["tables"]["orders"]["fields"]["status"]["type"], json!("VARCHAR(16)"));
    assert_eq!(doc["tables"]["orders"]["examples"], json!([]));
    assert_eq!(doc["tables"]["customers"]["comment"], json!(null));
    assert_eq!(
        doc["foreign_keys"][2],
        json!(["audit", "order_id", "archive", "orders_old", "id"])
    );
}

#[test]
fn test_reserved_table_examples_round_trip() {
    let doc = json!({
        "db_id": "shop",
        "tables": {
            "orders": {"fields": {}, "examples": ["row 1", "row 2"], "comment": "c"}
        }
    });
    let schema = MSchema::from_document(doc.clone()).unwrap();
    assert_eq!(schema.table("orders").unwrap().examples, vec!["row 1", "row 2"]);
    assert_eq!(schema.dump().unwrap()["tables"], doc["tables"]);
}

#[test]
fn test_load_replaces_instead_of_merging() {
    let mut schema = populated();
    schema
        .load(json!({"db_id": "other", "tables": {"t": {"fields": {}}}}))
        .unwrap();

    assert_eq!(schema.db_id(), "other");
    assert_eq!(schema.namespace(), None);
    assert_eq!(table_names(&schema), vec!["t"]);
    assert!(schema.foreign_keys().is_empty());
}

#[test]
fn test_load_rejects_wrong_shapes() {
    let bad_docs = [
        json!({"tables": []}),
        json!({"db_id": 5}),
        json!({"foreign_keys": [["a", "b", "c", "d"]]}),
        json!({"tables": {"t": {"fields": {"c": {"primary_key": "yes"}}}}}),
        json!(["not", "an", "object"]),
    ];
    for doc in bad_docs {
        let mut schema = MSchema::new("keep", None);
        let result = schema.load(doc.clone());
        assert!(
            matches!(result, Err(SchemaError::InvalidDocument(_))),
            "accepted {}",
            doc
        );
        assert_eq!(schema.db_id(), "keep");
    }
}

#[test]
fn test_from_json_str_rejects_garbage() {
    assert!(MSchema::from_json_str("{not json").is_err());
}
