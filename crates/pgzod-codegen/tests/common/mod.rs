#![allow(dead_code)]

use async_trait::async_trait;
use pgzod_core::{
    ConnectionConfig, FilterConfig, GeneratorConfig, IntrospectHooks, RawColumnDescriptor,
    RelationKind, Result, SchemaDescriptor, TableDescriptor,
};
use pgzod_introspect::{Connector, assemble_schema, describe_column};

pub struct ColumnSpec {
    pub name: &'static str,
    pub data_type: &'static str,
    pub nullable: bool,
    pub default: Option<&'static str>,
    pub max_length: Option<i32>,
    pub description: Option<&'static str>,
    pub checks: &'static [&'static str],
}

impl ColumnSpec {
    pub fn new(name: &'static str, data_type: &'static str) -> Self {
        Self {
            name,
            data_type,
            nullable: false,
            default: None,
            max_length: None,
            description: None,
            checks: &[],
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_default(mut self, expr: &'static str) -> Self {
        self.default = Some(expr);
        self
    }

    pub fn max_length(mut self, max: i32) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn described(mut self, text: &'static str) -> Self {
        self.description = Some(text);
        self
    }

    pub fn checks(mut self, clauses: &'static [&'static str]) -> Self {
        self.checks = clauses;
        self
    }
}

pub fn raw_rows(table: &str, kind: RelationKind, columns: &[ColumnSpec]) -> Vec<RawColumnDescriptor> {
    columns
        .iter()
        .enumerate()
        .map(|(idx, spec)| RawColumnDescriptor {
            name: spec.name.to_string(),
            table_name: table.to_string(),
            table_kind: kind,
            schema_name: "public".to_string(),
            data_type: spec.data_type.to_string(),
            is_nullable: spec.nullable,
            default: spec.default.map(str::to_string),
            max_length: spec.max_length,
            description: spec.description.map(str::to_string),
            check_constraints: spec.checks.iter().map(|c| c.to_string()).collect(),
            enum_labels: Vec::new(),
            ordinal_position: idx as i16 + 1,
        })
        .collect()
}

pub fn table(name: &str, kind: RelationKind, columns: &[ColumnSpec]) -> TableDescriptor {
    TableDescriptor {
        schema_name: "public".to_string(),
        name: name.to_string(),
        kind,
        columns: raw_rows(name, kind, columns)
            .into_iter()
            .map(describe_column)
            .collect(),
    }
}

pub fn config() -> GeneratorConfig {
    GeneratorConfig {
        connection: ConnectionConfig {
            connection_string: Some("postgres://tester@localhost/app".to_string()),
            ..ConnectionConfig::default()
        },
        ..GeneratorConfig::default()
    }
}

/// Connector serving canned catalog rows through the real assembly path.
pub struct StaticConnector {
    pub rows: Vec<RawColumnDescriptor>,
}

#[async_trait]
impl Connector for StaticConnector {
    fn engine(&self) -> &'static str {
        "static"
    }

    async fn fetch_schema(
        &self,
        connection: &ConnectionConfig,
        schema: &str,
        filter: &FilterConfig,
        hooks: &dyn IntrospectHooks,
    ) -> Result<SchemaDescriptor> {
        connection.validate()?;
        let filter = filter.compile()?;
        assemble_schema(schema, self.rows.clone(), &filter, hooks).await
    }
}

/// Connector that always fails to connect.
pub struct UnreachableConnector;

#[async_trait]
impl Connector for UnreachableConnector {
    fn engine(&self) -> &'static str {
        "unreachable"
    }

    async fn fetch_schema(
        &self,
        _connection: &ConnectionConfig,
        _schema: &str,
        _filter: &FilterConfig,
        _hooks: &dyn IntrospectHooks,
    ) -> Result<SchemaDescriptor> {
        Err(pgzod_core::Error::Connection("connection refused".to_string()))
    }
}
