mod common;

use async_trait::async_trait;
use common::{ColumnSpec, config, table};
use pgzod_codegen::{ColumnModel, ModelBuilder, ModelHooks, NoopHooks, TableModel};
use pgzod_core::{Error, FieldKind, HookError, RelationKind};

fn users() -> pgzod_core::TableDescriptor {
    table(
        "users",
        RelationKind::Table,
        &[
            ColumnSpec::new("id", "int4").with_default("nextval('users_id_seq'::regclass)"),
            ColumnSpec::new("email", "varchar").max_length(120),
            ColumnSpec::new("bio", "text"),
            ColumnSpec::new("status", "text")
                .checks(&["(status = ANY (ARRAY['active'::text, 'banned'::text]))"]),
            ColumnSpec::new("preferences", "jsonb").nullable(),
            ColumnSpec::new("settings", "json"),
        ],
    )
}

struct NullableBio;

#[async_trait]
impl ModelHooks for NullableBio {
    async fn column_model(&self, mut column: ColumnModel) -> Result<ColumnModel, HookError> {
        if column.column.name() == "bio" {
            column.column.raw.is_nullable = true;
            column.column.is_optional = true;
        }
        if column.column.name() == "email" {
            column.write_type = "z.string().email().max(255)".to_string();
        }
        Ok(column)
    }
}

#[tokio::test]
async fn unchanged_renders_follow_hook_semantics() {
    let builder = ModelBuilder::from_config(&config());
    let model = builder
        .build_table_model(&users(), &NullableBio)
        .await
        .expect("model");

    let bio = &model.columns[2];
    assert_eq!(
        bio.read_type,
        "z.string().nullable().transform((value) => value ?? undefined)"
    );
    assert_eq!(
        bio.write_type,
        "z.string().nullable().transform((value) => value ?? undefined).optional()"
    );

    let email = &model.columns[1];
    assert_eq!(email.write_type, "z.string().email().max(255)");
    assert_eq!(email.read_type, "z.string().email()");
}

struct RetypeBio(FieldKind);

#[async_trait]
impl ModelHooks for RetypeBio {
    async fn column_model(&self, mut column: ColumnModel) -> Result<ColumnModel, HookError> {
        if column.column.name() == "bio" {
            column.column.kind = self.0;
            if self.0 == FieldKind::String {
                column.column.enum_values = vec!["short".to_string(), "long".to_string()];
            }
        }
        Ok(column)
    }
}

#[tokio::test]
async fn hook_added_enum_values_produce_an_enum() {
    let model = ModelBuilder::from_config(&config())
        .build_table_model(&users(), &RetypeBio(FieldKind::String))
        .await
        .expect("model");

    let bio = &model.columns[2];
    assert_eq!(bio.enum_constant.as_deref(), Some("USER_BIOS"));
    assert_eq!(bio.read_type, "z.enum(USER_BIOS)");
    assert_eq!(bio.write_type, "z.enum(USER_BIOS)");

    let constants: Vec<&str> = model
        .enums
        .iter()
        .map(|definition| definition.constant_name.as_str())
        .collect();
    assert_eq!(constants, vec!["USER_BIOS", "USER_STATUSES"]);
}

#[tokio::test]
async fn hook_retyped_json_column_gets_an_import() {
    let mut cfg = config();
    cfg.json_schema_import_location = Some("../json-schemas".to_string());
    let model = ModelBuilder::from_config(&cfg)
        .build_table_model(&users(), &RetypeBio(FieldKind::Json))
        .await
        .expect("model");

    let bio = &model.columns[2];
    assert_eq!(bio.json_schema_name.as_deref(), Some("UserBioSchema"));
    assert_eq!(bio.read_type, "UserBioSchema");
    let imports: Vec<&str> = model
        .json_imports
        .iter()
        .map(|import| import.name.as_str())
        .collect();
    assert_eq!(
        imports,
        vec!["UserBioSchema", "UserPreferencesSchema", "UserSettingsSchema"]
    );
}

#[tokio::test]
async fn builds_names_enums_and_writable_subset() {
    let builder = ModelBuilder::from_config(&config());
    let model = builder
        .build_table_model(&users(), &NoopHooks)
        .await
        .expect("model");

    assert_eq!(model.file_name, "users");
    assert_eq!(model.names.select_schema, "SelectUsersTableSchema");
    assert_eq!(model.names.insert_type, "InsertUser");
    assert_eq!(model.names.update_schema, "UpdateUsersTableSchema");
    assert!(model.supports_write);

    let writable: Vec<&str> = model
        .writable_columns
        .iter()
        .map(|column| column.column.name())
        .collect();
    assert_eq!(
        writable,
        vec!["email", "bio", "status", "preferences", "settings"]
    );
    assert_eq!(model.columns[0].read_type, "z.number().int()");

    assert_eq!(model.enums.len(), 1);
    let status = &model.enums[0];
    assert_eq!(status.constant_name, "USER_STATUSES");
    assert_eq!(status.schema_name, "UserStatusSchema");
    assert_eq!(status.type_name, "UserStatus");
    let flags: Vec<(&str, bool)> = status
        .values
        .iter()
        .map(|value| (value.value.as_str(), value.is_last))
        .collect();
    assert_eq!(flags, vec![("active", false), ("banned", true)]);

    assert!(model.json_imports.is_empty());
    assert_eq!(model.columns[4].json_schema_name, None);
}

#[tokio::test]
async fn json_imports_only_with_location() {
    let mut cfg = config();
    cfg.json_schema_import_location = Some("../json-schemas".to_string());
    let model = ModelBuilder::from_config(&cfg)
        .build_table_model(&users(), &NoopHooks)
        .await
        .expect("model");

    let imports: Vec<(&str, bool)> = model
        .json_imports
        .iter()
        .map(|import| (import.name.as_str(), import.is_last))
        .collect();
    assert_eq!(
        imports,
        vec![
            ("UserPreferencesSchema", false),
            ("UserSettingsSchema", true)
        ]
    );
    assert_eq!(
        model.columns[5].read_type,
        "UserSettingsSchema"
    );
}

#[tokio::test]
async fn views_and_serials_are_not_writable() {
    let view = table(
        "active_users",
        RelationKind::View,
        &[
            ColumnSpec::new("id", "serial"),
            ColumnSpec::new("email", "text"),
        ],
    );
    let model = ModelBuilder::from_config(&config())
        .build_table_model(&view, &NoopHooks)
        .await
        .expect("model");

    assert_eq!(model.columns.len(), 2);
    assert!(model.writable_columns.is_empty());
    assert!(!model.supports_write);
    assert_eq!(model.names.select_schema, "SelectActiveUsersViewSchema");
}

struct ReplaceTable;

#[async_trait]
impl ModelHooks for ReplaceTable {
    async fn table_model(&self, mut table: TableModel) -> Result<TableModel, HookError> {
        table.names.select_schema = "UserRow".to_string();
        table.supports_write = false;
        Ok(table)
    }
}

#[tokio::test]
async fn table_hook_replaces_the_model() {
    let model = ModelBuilder::from_config(&config())
        .build_table_model(&users(), &ReplaceTable)
        .await
        .expect("model");
    assert_eq!(model.names.select_schema, "UserRow");
    assert!(!model.supports_write);
}

#[derive(Debug)]
struct Rejected(&'static str);

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rejected column {}", self.0)
    }
}

impl std::error::Error for Rejected {}

struct RejectStatus;

#[async_trait]
impl ModelHooks for RejectStatus {
    async fn column_model(&self, column: ColumnModel) -> Result<ColumnModel, HookError> {
        if column.column.name() == "status" {
            return Err(Box::new(Rejected("status")));
        }
        Ok(column)
    }
}

#[tokio::test]
async fn hook_errors_propagate_unmodified() {
    let err = ModelBuilder::from_config(&config())
        .build_table_model(&users(), &RejectStatus)
        .await
        .unwrap_err();

    match err {
        Error::Hook(inner) => {
            assert_eq!(inner.to_string(), "rejected column status");
            assert!(inner.downcast_ref::<Rejected>().is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
}
