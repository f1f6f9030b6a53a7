use pgzod_core::{
    ColumnDescriptor, FieldKind, GeneratorConfig, RawColumnDescriptor, RelationKind,
    SchemaDescriptor, TableDescriptor,
};
use schemars::schema_for;

fn status_column() -> ColumnDescriptor {
    ColumnDescriptor::new(
        RawColumnDescriptor {
            name: "status".to_string(),
            table_name: "orders".to_string(),
            table_kind: RelationKind::Table,
            schema_name: "public".to_string(),
            data_type: "text".to_string(),
            is_nullable: false,
            default: None,
            max_length: None,
            description: None,
            check_constraints: vec!["(status = ANY (ARRAY['new'::text]))".to_string()],
            enum_labels: Vec::new(),
            ordinal_position: 2,
        },
        FieldKind::String,
        false,
        false,
        vec!["new".to_string()],
    )
}

#[test]
fn column_descriptor_serializes_flat() {
    let value = serde_json::to_value(status_column()).expect("serialize column");
    assert_eq!(value["name"], "status");
    assert_eq!(value["table_kind"], "table");
    assert_eq!(value["kind"], "string");
    assert_eq!(value["is_writable"], true);
    assert_eq!(value["enum_values"][0], "new");
    assert!(value.get("raw").is_none());
}

#[test]
fn schema_descriptor_round_trips() {
    let schema = SchemaDescriptor {
        name: "public".to_string(),
        tables: vec![TableDescriptor {
            schema_name: "public".to_string(),
            name: "orders".to_string(),
            kind: RelationKind::Table,
            columns: vec![status_column()],
        }],
    };

    let json = serde_json::to_string(&schema).expect("serialize schema");
    let parsed: SchemaDescriptor = serde_json::from_str(&json).expect("parse schema");
    assert_eq!(parsed, schema);
}

#[test]
fn config_json_schema_lists_options() {
    let schema = schema_for!(GeneratorConfig);
    let json = serde_json::to_value(&schema).expect("serialize json schema");
    let properties = json["properties"].as_object().expect("properties");
    for key in ["connection", "schema", "include", "exclude", "dialect", "singularize"] {
        assert!(properties.contains_key(key), "missing property {key}");
    }
}

#[test]
fn descriptor_json_schema_describes_columns() {
    let schema = schema_for!(SchemaDescriptor);
    let json = serde_json::to_value(&schema).expect("serialize json schema");
    assert!(json["properties"]["tables"].is_object());

    let definitions = json["definitions"].as_object().expect("definitions");
    for name in ["TableDescriptor", "ColumnDescriptor", "RelationKind", "FieldKind"] {
        assert!(definitions.contains_key(name), "missing definition {name}");
    }
    let column = &definitions["ColumnDescriptor"]["properties"];
    for key in ["name", "data_type", "kind", "is_writable", "enum_values"] {
        assert!(column.get(key).is_some(), "missing column property {key}");
    }
}
