use serde::Serialize;
use tracing::debug;

use pgzod_core::{
    ColumnDescriptor, Error, FieldKind, GeneratorConfig, RelationKind, Result, TableDescriptor,
};

use crate::hooks::ModelHooks;
use crate::naming::{Naming, Operation};
use crate::render::Renderer;

/// A column ready for rendering: its descriptor plus resolved names and
/// rendered read/write expressions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnModel {
    pub column: ColumnDescriptor,
    pub property_name: String,
    /// Set for enum columns.
    pub enum_constant: Option<String>,
    /// Set for JSON columns when a sub-schema import location is configured.
    pub json_schema_name: Option<String>,
    pub read_type: String,
    pub write_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    pub value: String,
    pub is_last: bool,
}

/// Constant, schema and type emitted for one enum column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDefinition {
    pub column_name: String,
    pub constant_name: String,
    pub schema_name: String,
    pub type_name: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonSchemaImport {
    pub name: String,
    pub is_last: bool,
}

/// Identifiers of the three generated schemas and their record types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableNames {
    pub select_schema: String,
    pub insert_schema: String,
    pub update_schema: String,
    pub select_type: String,
    pub insert_type: String,
    pub update_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableModel {
    pub schema_name: String,
    pub table_name: String,
    pub kind: RelationKind,
    pub file_name: String,
    pub columns: Vec<ColumnModel>,
    pub writable_columns: Vec<ColumnModel>,
    pub enums: Vec<EnumDefinition>,
    pub json_imports: Vec<JsonSchemaImport>,
    pub json_import_location: Option<String>,
    pub names: TableNames,
    /// False when no column is writable, e.g. for views.
    pub supports_write: bool,
}

/// Turns table descriptors into table models, running the model hooks.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    naming: Naming,
    renderer: Renderer,
    json_import_location: Option<String>,
}

impl ModelBuilder {
    pub fn new(naming: Naming, renderer: Renderer, json_import_location: Option<String>) -> Self {
        Self {
            naming,
            renderer,
            json_import_location,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(
            Naming::new(
                config.field_name_casing,
                config.object_name_casing,
                config.singularize,
            ),
            Renderer::from_config(config),
            config
                .json_schema_import_location
                .clone()
                .filter(|location| !location.trim().is_empty()),
        )
    }

    pub fn naming(&self) -> &Naming {
        &self.naming
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Base model for one column with both shapes rendered.
    pub fn column_model(&self, table_name: &str, column: ColumnDescriptor) -> ColumnModel {
        let mut model = ColumnModel {
            property_name: self.naming.property(column.name()),
            enum_constant: self.enum_constant_for(table_name, &column),
            json_schema_name: self.json_schema_for(table_name, &column),
            read_type: String::new(),
            write_type: String::new(),
            column,
        };
        model.read_type = self.renderer.render_read(&model);
        model.write_type = self.renderer.render_write(&model);
        model
    }

    fn enum_constant_for(&self, table_name: &str, column: &ColumnDescriptor) -> Option<String> {
        column
            .is_enum()
            .then(|| self.naming.enum_constant(table_name, column.name()))
    }

    fn json_schema_for(&self, table_name: &str, column: &ColumnDescriptor) -> Option<String> {
        (column.kind == FieldKind::Json && self.json_import_location.is_some())
            .then(|| self.naming.json_schema(table_name, column.name()))
    }

    /// Build the model for `table`.
    ///
    /// After the column hook runs, a derived field the hook left unchanged
    /// (enum constant, JSON-schema name, rendered read/write types) is derived
    /// again from the hook's output; a field the hook rewrote is kept verbatim.
    pub async fn build_table_model(
        &self,
        table: &TableDescriptor,
        hooks: &dyn ModelHooks,
    ) -> Result<TableModel> {
        let mut columns = Vec::with_capacity(table.columns.len());

        for descriptor in &table.columns {
            let base = self.column_model(&table.name, descriptor.clone());
            let base_enum_constant = base.enum_constant.clone();
            let base_json_schema_name = base.json_schema_name.clone();
            let rendered_read = base.read_type.clone();
            let rendered_write = base.write_type.clone();

            let mut column = hooks.column_model(base).await.map_err(Error::hook)?;
            if column.enum_constant == base_enum_constant {
                column.enum_constant = self.enum_constant_for(&table.name, &column.column);
            }
            if column.json_schema_name == base_json_schema_name {
                column.json_schema_name = self.json_schema_for(&table.name, &column.column);
            }
            if column.read_type == rendered_read {
                column.read_type = self.renderer.render_read(&column);
            } else {
                debug!(table = %table.name, column = %column.column.name(), "read type set by hook");
            }
            if column.write_type == rendered_write {
                column.write_type = self.renderer.render_write(&column);
            } else {
                debug!(table = %table.name, column = %column.column.name(), "write type set by hook");
            }
            columns.push(column);
        }

        let writable_columns: Vec<ColumnModel> = columns
            .iter()
            .filter(|column| column.column.is_writable)
            .cloned()
            .collect();

        let model = TableModel {
            schema_name: table.schema_name.clone(),
            table_name: table.name.clone(),
            kind: table.kind,
            file_name: self.naming.file_name(&table.name),
            enums: self.enum_definitions(&table.name, &columns),
            json_imports: self.json_imports(&columns),
            json_import_location: self.json_import_location.clone(),
            names: self.table_names(&table.name, table.kind),
            supports_write: !writable_columns.is_empty(),
            writable_columns,
            columns,
        };

        hooks.table_model(model).await.map_err(Error::hook)
    }

    fn enum_definitions(&self, table_name: &str, columns: &[ColumnModel]) -> Vec<EnumDefinition> {
        columns
            .iter()
            .filter(|column| column.column.is_enum())
            .filter_map(|column| {
                let constant_name = column.enum_constant.clone()?;
                let name = column.column.name();
                Some(EnumDefinition {
                    column_name: name.to_string(),
                    constant_name,
                    schema_name: self.naming.enum_schema(table_name, name),
                    type_name: self.naming.enum_type(table_name, name),
                    values: mark_last(&column.column.enum_values, |value, is_last| EnumValue {
                        value: value.clone(),
                        is_last,
                    }),
                })
            })
            .collect()
    }

    fn json_imports(&self, columns: &[ColumnModel]) -> Vec<JsonSchemaImport> {
        if self.json_import_location.is_none() {
            return Vec::new();
        }
        let names: Vec<String> = columns
            .iter()
            .filter(|column| column.column.kind == FieldKind::Json)
            .filter_map(|column| column.json_schema_name.clone())
            .collect();
        mark_last(&names, |name, is_last| JsonSchemaImport {
            name: name.clone(),
            is_last,
        })
    }

    fn table_names(&self, table_name: &str, kind: RelationKind) -> TableNames {
        TableNames {
            select_schema: self.naming.table_schema(Operation::Select, table_name, kind),
            insert_schema: self.naming.table_schema(Operation::Insert, table_name, kind),
            update_schema: self.naming.table_schema(Operation::Update, table_name, kind),
            select_type: self.naming.record_type(Operation::Select, table_name),
            insert_type: self.naming.record_type(Operation::Insert, table_name),
            update_type: self.naming.record_type(Operation::Update, table_name),
        }
    }
}

fn mark_last<T, U>(items: &[T], build: impl Fn(&T, bool) -> U) -> Vec<U> {
    let last = items.len().saturating_sub(1);
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| build(item, idx == last))
        .collect()
}
