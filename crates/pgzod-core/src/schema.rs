use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of relation reported by the catalog.
///
/// Declaration order is the sort order used for deterministic output.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Table,
    View,
    MaterializedView,
    ForeignTable,
    Unknown,
}

impl RelationKind {
    /// Convert a Postgres `relkind` code.
    pub fn from_relkind(code: &str) -> Self {
        match code {
            "r" | "p" => RelationKind::Table,
            "v" => RelationKind::View,
            "m" => RelationKind::MaterializedView,
            "f" => RelationKind::ForeignTable,
            _ => RelationKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Table => "table",
            RelationKind::View => "view",
            RelationKind::MaterializedView => "materialized_view",
            RelationKind::ForeignTable => "foreign_table",
            RelationKind::Unknown => "relation",
        }
    }
}

/// Semantic field kind a column maps onto.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    Uuid,
    Json,
    Unknown,
}

/// One catalog row describing a (relation, column) pair, before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawColumnDescriptor {
    pub name: String,
    pub table_name: String,
    pub table_kind: RelationKind,
    pub schema_name: String,
    /// Underlying type name, e.g. `int4` or `_text` for `text[]`.
    pub data_type: String,
    pub is_nullable: bool,
    pub default: Option<String>,
    pub max_length: Option<i32>,
    pub description: Option<String>,
    /// Raw CHECK clauses attached to this column.
    pub check_constraints: Vec<String>,
    /// Labels of the column's native enum type, if it has one.
    pub enum_labels: Vec<String>,
    pub ordinal_position: i16,
}

/// A raw column enriched with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnDescriptor {
    #[serde(flatten)]
    pub raw: RawColumnDescriptor,
    pub kind: FieldKind,
    pub is_array: bool,
    pub is_auto_generated: bool,
    pub is_writable: bool,
    pub is_optional: bool,
    pub enum_values: Vec<String>,
}

impl ColumnDescriptor {
    /// Build a descriptor, deriving writability and optionality from the raw row.
    pub fn new(
        raw: RawColumnDescriptor,
        kind: FieldKind,
        is_array: bool,
        is_auto_generated: bool,
        enum_values: Vec<String>,
    ) -> Self {
        let is_writable = !is_auto_generated && raw.table_kind == RelationKind::Table;
        let is_optional = raw.is_nullable || raw.default.is_some();
        Self {
            raw,
            kind,
            is_array,
            is_auto_generated,
            is_writable,
            is_optional,
            enum_values,
        }
    }

    pub fn name(&self) -> &str {
        &self.raw.name
    }

    pub fn is_nullable(&self) -> bool {
        self.raw.is_nullable
    }

    pub fn is_enum(&self) -> bool {
        !self.enum_values.is_empty()
    }
}

/// A relation with its ordered columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TableDescriptor {
    pub schema_name: String,
    pub name: String,
    pub kind: RelationKind,
    pub columns: Vec<ColumnDescriptor>,
}

/// All relations captured for one schema, sorted by `(kind, name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaDescriptor {
    pub name: String,
    pub tables: Vec<TableDescriptor>,
}

impl SchemaDescriptor {
    pub fn sort_tables(&mut self) {
        self.tables
            .sort_by(|left, right| left.kind.cmp(&right.kind).then_with(|| left.name.cmp(&right.name)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(table_kind: RelationKind, default: Option<&str>, nullable: bool) -> RawColumnDescriptor {
        RawColumnDescriptor {
            name: "id".to_string(),
            table_name: "users".to_string(),
            table_kind,
            schema_name: "public".to_string(),
            data_type: "int4".to_string(),
            is_nullable: nullable,
            default: default.map(str::to_string),
            max_length: None,
            description: None,
            check_constraints: Vec::new(),
            enum_labels: Vec::new(),
            ordinal_position: 1,
        }
    }

    #[test]
    fn auto_generated_columns_are_not_writable() {
        let column = ColumnDescriptor::new(
            raw(RelationKind::Table, Some("nextval('users_id_seq'::regclass)"), false),
            FieldKind::Integer,
            false,
            true,
            Vec::new(),
        );
        assert!(!column.is_writable);
        assert!(column.is_optional);
    }

    #[test]
    fn view_columns_are_never_writable() {
        let column = ColumnDescriptor::new(
            raw(RelationKind::View, None, false),
            FieldKind::Integer,
            false,
            false,
            Vec::new(),
        );
        assert!(!column.is_writable);
        assert!(!column.is_optional);
    }

    #[test]
    fn enum_flag_follows_values() {
        let mut column = ColumnDescriptor::new(
            raw(RelationKind::Table, None, true),
            FieldKind::String,
            false,
            false,
            vec!["a".to_string()],
        );
        assert!(column.is_enum());
        column.enum_values.clear();
        assert!(!column.is_enum());
    }

    #[test]
    fn tables_sort_by_kind_then_name() {
        let table = |name: &str, kind| TableDescriptor {
            schema_name: "public".to_string(),
            name: name.to_string(),
            kind,
            columns: Vec::new(),
        };
        let mut schema = SchemaDescriptor {
            name: "public".to_string(),
            tables: vec![
                table("b_view", RelationKind::View),
                table("zeta", RelationKind::Table),
                table("alpha", RelationKind::Table),
            ],
        };
        schema.sort_tables();
        let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta", "b_view"]);
    }
}
