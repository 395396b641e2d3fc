use indexmap::IndexMap;
use mschema::model::simplified_type;
use mschema::{FieldEntry, FieldSpec, MSchema, SchemaError};

fn shop() -> MSchema {
    let mut schema = MSchema::new("shop", None);
    schema.add_table("customers", IndexMap::new(), Some("People who buy".to_string()));
    schema.add_table("orders", IndexMap::new(), None);
    schema
        .add_field(
            "customers",
            "id",
            FieldSpec::new("INTEGER").primary_key().not_null().autoincrement(true),
        )
        .unwrap();
    schema
        .add_field("customers", "name", FieldSpec::new("VARCHAR(50)").comment("Full name"))
        .unwrap();
    schema
        .add_field("orders", "id", FieldSpec::new("INTEGER").primary_key())
        .unwrap();
    schema
        .add_field("orders", "customer_id", FieldSpec::new("INTEGER"))
        .unwrap();
    schema.add_foreign_key("orders", "customer_id", "", "customers", "id");
    schema
}

#[test]
fn test_tables_keep_insertion_order() {
    let schema = shop();
    let tables: Vec<_> = schema.tables().keys().map(String::as_str).collect();
    assert_eq!(tables, vec!["customers", "orders"]);

    let columns: Vec<_> = schema.table("customers").unwrap().fields.keys().collect();
    assert_eq!(columns, vec!["id", "name"]);
}

#[test]
fn test_field_attributes_stored() {
    let schema = shop();
    let id = schema.field_info("customers", "id").unwrap();
    assert_eq!(id.field_type, "INTEGER");
    assert!(id.primary_key);
    assert!(!id.nullable);
    assert!(id.autoincrement);

    let name = schema.field_info("customers", "name").unwrap();
    assert_eq!(name.comment, "Full name");
    assert!(name.nullable);
    assert_eq!(name.default, None);
}

#[test]
fn test_add_field_overwrites() {
    let mut schema = shop();
    schema
        .add_field("orders", "customer_id", FieldSpec::new("BIGINT").not_null())
        .unwrap();

    let field = schema.field_info("orders", "customer_id").unwrap();
    assert_eq!(field.field_type, "BIGINT");
    assert!(!field.nullable);
    assert_eq!(schema.table("orders").unwrap().fields.len(), 2);
}

#[test]
fn test_add_table_with_fields_takes_ownership() {
    let mut fields = IndexMap::new();
    fields.insert("sku".to_string(), FieldEntry::from(FieldSpec::new("TEXT")));

    let mut schema = MSchema::default();
    schema.add_table("products", fields.clone(), None);
    fields.insert("extra".to_string(), FieldEntry::default());

    assert!(schema.has_column("products", "sku"));
    assert!(!schema.has_column("products", "extra"));
}

#[test]
fn test_add_field_requires_table() {
    let mut schema = shop();
    let result = schema.add_field("payments", "id", FieldSpec::new("INTEGER"));
    assert!(matches!(result, Err(SchemaError::UnknownTable(t)) if t == "payments"));
}

#[test]
fn test_missing_lookups_resolve_to_none() {
    let schema = shop();
    assert!(!schema.has_table("payments"));
    assert!(!schema.has_column("payments", "id"));
    assert!(schema.field_info("payments", "id").is_none());
    assert!(schema.field_info("orders", "total").is_none());
    assert!(schema.table("payments").is_none());
}

#[test]
fn test_default_values_are_text() {
    let mut schema = shop();
    schema
        .add_field("orders", "qty", FieldSpec::new("INTEGER").default_value(1))
        .unwrap();
    schema
        .add_field("orders", "paid", FieldSpec::new("BOOLEAN").default_value(false))
        .unwrap();
    schema
        .add_field("orders", "memo", FieldSpec::new("TEXT").default_value("None"))
        .unwrap();

    assert_eq!(schema.field_info("orders", "qty").unwrap().default.as_deref(), Some("1"));
    assert_eq!(schema.field_info("orders", "paid").unwrap().default.as_deref(), Some("false"));
    assert_eq!(schema.field_info("orders", "memo").unwrap().default.as_deref(), Some("None"));
    assert_eq!(schema.field_info("orders", "id").unwrap().default, None);
}

#[test]
fn test_foreign_keys_may_dangle() {
    let mut schema = shop();
    schema.add_foreign_key("orders", "coupon_id", "", "coupons", "id");
    let edge = schema.foreign_keys().last().unwrap();
    assert_eq!(edge.referenced_table(), "coupons");
    assert!(!schema.has_table("coupons"));
}

#[test]
fn test_simplified_type_through_schema() {
    let schema = shop();
    assert_eq!(schema.simplified_type("VARCHAR(50)", true), "VARCHAR");
    assert_eq!(schema.simplified_type("VARCHAR(50)", false), "VARCHAR(50)");

    for t in ["DECIMAL(10,2)", "TEXT", "", "(x)", "A(B)(C)"] {
        let once = simplified_type(t, true);
        assert_eq!(simplified_type(once, true), once);
    }
}
