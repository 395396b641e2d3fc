use mschema::metadata::{
    IntrospectError, Introspector, SampleOutcome, SchemaBuilder, SqliteIntrospector,
};
use mschema::{ForeignKeyEdge, RenderOptions, SampleValue};
use rusqlite::Connection;

const SHOP_DDL: &str = "
    CREATE TABLE customers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(50) NOT NULL,
        email TEXT,
        signup DATE,
        country TEXT DEFAULT 'CN'
    );
    CREATE TABLE orders (
        id INTEGER PRIMARY KEY,
        customer_id INTEGER REFERENCES customers(id),
        amount REAL,
        note TEXT
    );
    CREATE TABLE notes (
        id INTEGER PRIMARY KEY,
        customer_id INTEGER REFERENCES customers
    );

    INSERT INTO customers (name, email, signup, country) VALUES
        ('Alice', 'alice@example.com', '2024-01-05', 'CN'),
        ('Bob', 'bob@example.com', '2024-02-11', 'US'),
        ('Carol', NULL, NULL, 'US');
    INSERT INTO orders (customer_id, amount, note) VALUES
        (1, 12.5, NULL),
        (1, 30.25, ''),
        (2, 12.5, 'see https://example.com/order/3');
";

fn shop_introspector() -> SqliteIntrospector {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SHOP_DDL).unwrap();
    SqliteIntrospector::from_connection(conn)
}

#[test]
fn test_lists_user_tables_only() {
    let introspector = shop_introspector();
    assert_eq!(introspector.list_namespaces().unwrap(), vec!["main"]);
    // sqlite_sequence exists because of AUTOINCREMENT but is internal.
    assert_eq!(
        introspector.list_tables("main").unwrap(),
        vec!["customers", "orders", "notes"]
    );
}

#[test]
fn test_columns() {
    let introspector = shop_introspector();
    let columns = introspector.columns("main", "customers").unwrap();

    let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "email", "signup", "country"]);

    let id = &columns[0];
    assert!(id.primary_key);
    assert!(id.autoincrement);
    assert_eq!(id.data_type, "INTEGER");

    let name = &columns[1];
    assert!(name.not_null);
    assert_eq!(name.data_type, "VARCHAR(50)");

    assert_eq!(columns[4].default.as_deref(), Some("'CN'"));

    let orders = introspector.columns("main", "orders").unwrap();
    assert!(orders[0].primary_key);
    assert!(!orders[0].autoincrement);
}

#[test]
fn test_foreign_keys() {
    let introspector = shop_introspector();

    let fks = introspector.foreign_keys("main", "orders").unwrap();
    assert_eq!(fks.len(), 1);
    assert_eq!(fks[0].column, "customer_id");
    assert_eq!(fks[0].referenced_table, "customers");
    assert_eq!(fks[0].referenced_column, "id");
    assert_eq!(fks[0].referenced_namespace, "main");

    // No column list: resolved to the referenced primary key.
    let fks = introspector.foreign_keys("main", "notes").unwrap();
    assert_eq!(fks[0].referenced_column, "id");
}

#[test]
fn test_distinct_values() {
    let introspector = shop_introspector();

    let amounts = introspector.distinct_values("main", "orders", "amount", 5).unwrap();
    assert_eq!(amounts, vec![SampleValue::Real(12.5), SampleValue::Real(30.25)]);

    let signups = introspector.distinct_values("main", "customers", "signup", 5).unwrap();
    assert_eq!(
        signups,
        vec![
            SampleValue::temporal("2024-01-05"),
            SampleValue::temporal("2024-02-11")
        ]
    );

    // NULL and empty strings are dropped.
    let notes = introspector.distinct_values("main", "orders", "note", 5).unwrap();
    assert_eq!(notes, vec![SampleValue::text("see https://example.com/order/3")]);

    let limited = introspector.distinct_values("main", "customers", "name", 2).unwrap();
    assert_eq!(limited.len(), 2);
}

#[test]
fn test_sample_values_reports_failures() {
    let introspector = shop_introspector();
    let outcome = introspector.sample_values("main", "no_such_table", "id", 5);
    assert!(outcome.is_unavailable());
    assert!(outcome.values().is_empty());

    let outcome = introspector.sample_values("main", "orders", "customer_id", 5);
    assert_eq!(
        outcome,
        SampleOutcome::Fetched(vec![SampleValue::Integer(1), SampleValue::Integer(2)])
    );
}

#[test]
fn test_build_shop_schema() {
    let introspector = shop_introspector();
    let report = SchemaBuilder::new("shop").build(&introspector).unwrap();
    assert!(report.issues.is_empty());

    let schema = report.schema;
    assert_eq!(schema.db_id(), "shop");
    assert_eq!(schema.namespace(), None);

    let email = schema.field_info("customers", "email").unwrap();
    assert!(email.examples.is_empty());

    let name = schema.field_info("customers", "name").unwrap();
    assert_eq!(name.examples, vec!["Alice", "Bob", "Carol"]);
    assert!(!name.nullable);

    let signup = schema.field_info("customers", "signup").unwrap();
    assert_eq!(signup.examples, vec!["2024-01-05"]);

    let amount = schema.field_info("orders", "amount").unwrap();
    assert_eq!(amount.examples, vec!["12.5", "30.25"]);

    assert!(schema.field_info("orders", "note").unwrap().examples.is_empty());
    assert_eq!(
        schema.field_info("customers", "country").unwrap().default.as_deref(),
        Some("'CN'")
    );

    assert_eq!(
        schema.foreign_keys(),
        &[
            ForeignKeyEdge::new("orders", "customer_id", "", "customers", "id"),
            ForeignKeyEdge::new("notes", "customer_id", "", "customers", "id"),
        ]
    );

    let text = schema.render(&RenderOptions::default());
    assert!(text.starts_with("【DB_ID】 shop\n【Schema】\n# Table: customers\n"));
    assert!(text.contains("(id:INTEGER, Primary Key, Examples: [1, 2, 3])"));
    assert!(text.contains("(name:VARCHAR, Examples: [Alice, Bob, Carol])"));
    assert!(text.contains("(email:TEXT)"));
    assert!(text.contains("(signup:DATE, Examples: [2024-01-05])"));
    assert!(text.contains("orders.customer_id=customers.id"));
    assert!(text.contains("notes.customer_id=customers.id"));
}

#[test]
fn test_build_with_attached_namespace() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SHOP_DDL).unwrap();
    conn.execute_batch(
        "ATTACH DATABASE ':memory:' AS archive;
         CREATE TABLE archive.old_orders (id INTEGER PRIMARY KEY, status TEXT);
         INSERT INTO archive.old_orders (status) VALUES ('closed');",
    )
    .unwrap();
    let introspector = SqliteIntrospector::from_connection(conn);

    let all = SchemaBuilder::new("shop").build(&introspector).unwrap().schema;
    assert!(all.has_table("customers"));
    assert!(all.has_table("archive.old_orders"));

    let archive = SchemaBuilder::new("shop")
        .with_namespace(Some("archive".to_string()))
        .with_sample_limit(1)
        .build(&introspector)
        .unwrap()
        .schema;
    assert_eq!(archive.namespace(), Some("archive"));
    let names: Vec<_> = archive.tables().keys().cloned().collect();
    assert_eq!(names, vec!["old_orders"]);

    let text = archive.to_mschema();
    assert!(text.contains("# Table: archive.old_orders"));
    assert!(text.contains("(status:TEXT, Examples: [closed])"));
}

#[test]
fn test_build_main_namespace_keeps_foreign_keys() {
    let introspector = shop_introspector();
    let schema = SchemaBuilder::new("shop")
        .with_namespace(Some("main".to_string()))
        .build(&introspector)
        .unwrap()
        .schema;

    assert_eq!(schema.foreign_keys()[0].referenced_namespace(), "main");
    let text = schema.to_mschema();
    assert!(text.contains("# Table: main.orders"));
    assert!(text.contains("orders.customer_id=customers.id"));
}

#[test]
fn test_build_unknown_namespace() {
    let introspector = shop_introspector();
    let result = SchemaBuilder::new("shop")
        .with_namespace(Some("nope".to_string()))
        .build(&introspector);
    assert!(matches!(result, Err(IntrospectError::UnknownNamespace(_))));
}

#[test]
fn test_open_file_read_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.sqlite");
    Connection::open(&path).unwrap().execute_batch(SHOP_DDL).unwrap();

    let introspector = SqliteIntrospector::open(&path).unwrap();
    let report = SchemaBuilder::new("shop").build(&introspector).unwrap();
    assert_eq!(report.schema.tables().len(), 3);
    assert!(introspector
        .connection()
        .execute_batch("CREATE TABLE t (x INTEGER);")
        .is_err());
}
