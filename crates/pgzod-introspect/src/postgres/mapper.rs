use std::collections::BTreeMap;

use tracing::debug;

use pgzod_core::{
    ColumnDescriptor, Error, IntrospectHooks, RawColumnDescriptor, Result, SchemaDescriptor,
    TableDescriptor, TableFilter,
};

use crate::check_clause::extract_enum_values;
use crate::classify::classify;

/// Classify a raw column and attach its recovered enum values.
///
/// Values parsed from CHECK clauses take precedence over native enum labels.
pub fn describe_column(raw: RawColumnDescriptor) -> ColumnDescriptor {
    let classification = classify(&raw);
    let mut enum_values = if raw.check_constraints.is_empty() {
        Vec::new()
    } else {
        extract_enum_values(&raw.name, &raw.check_constraints)
    };
    if enum_values.is_empty() {
        enum_values = raw.enum_labels.clone();
    }

    ColumnDescriptor::new(
        raw,
        classification.kind,
        classification.is_array,
        classification.is_auto_generated,
        enum_values,
    )
}

/// Group raw rows into filtered, hook-processed table descriptors.
///
/// Columns are grouped by the (schema, table) of their catalog row.
pub async fn assemble_schema(
    schema_name: &str,
    rows: Vec<RawColumnDescriptor>,
    filter: &TableFilter,
    hooks: &dyn IntrospectHooks,
) -> Result<SchemaDescriptor> {
    let mut grouped: BTreeMap<(String, String), TableDescriptor> = BTreeMap::new();

    for raw in rows {
        if !filter.allows(&raw.table_name) {
            continue;
        }

        let key = (raw.schema_name.clone(), raw.table_name.clone());
        let kind = raw.table_kind;
        let column = hooks
            .column_descriptor(describe_column(raw))
            .await
            .map_err(Error::hook)?;

        grouped
            .entry(key)
            .or_insert_with_key(|(schema, table)| TableDescriptor {
                schema_name: schema.clone(),
                name: table.clone(),
                kind,
                columns: Vec::new(),
            })
            .columns
            .push(column);
    }

    let mut tables = Vec::with_capacity(grouped.len());
    for (_, mut table) in grouped {
        table.columns.sort_by_key(|column| column.raw.ordinal_position);
        debug!(
            schema = %table.schema_name,
            table = %table.name,
            columns = table.columns.len(),
            "table grouped"
        );
        tables.push(hooks.table_descriptor(table).await.map_err(Error::hook)?);
    }

    let mut schema = SchemaDescriptor {
        name: schema_name.to_string(),
        tables,
    };
    schema.sort_tables();
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pgzod_core::{FieldKind, FilterSpec, HookError, RelationKind};

    struct NoHooks;

    impl IntrospectHooks for NoHooks {}

    fn row(table: &str, kind: RelationKind, column: &str, position: i16) -> RawColumnDescriptor {
        RawColumnDescriptor {
            name: column.to_string(),
            table_name: table.to_string(),
            table_kind: kind,
            schema_name: "public".to_string(),
            data_type: "text".to_string(),
            is_nullable: false,
            default: None,
            max_length: None,
            description: None,
            check_constraints: Vec::new(),
            enum_labels: Vec::new(),
            ordinal_position: position,
        }
    }

    #[tokio::test]
    async fn groups_sorts_and_orders_columns() {
        let rows = vec![
            row("zeta", RelationKind::Table, "b", 2),
            row("report", RelationKind::View, "x", 1),
            row("zeta", RelationKind::Table, "a", 1),
            row("alpha", RelationKind::Table, "id", 1),
        ];

        let schema = assemble_schema("public", rows, &TableFilter::default(), &NoHooks)
            .await
            .expect("assemble");

        let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta", "report"]);

        let zeta: Vec<&str> = schema.tables[1].columns.iter().map(|c| c.name()).collect();
        assert_eq!(zeta, vec!["a", "b"]);
        assert!(!schema.tables[2].columns[0].is_writable);
    }

    #[tokio::test]
    async fn include_then_exclude() {
        let rows = vec![
            row("a", RelationKind::Table, "id", 1),
            row("b", RelationKind::Table, "id", 1),
            row("c", RelationKind::Table, "id", 1),
        ];
        let filter = TableFilter::new(
            Some(&FilterSpec::Pattern("^a|b".to_string())),
            Some(&FilterSpec::Pattern("b".to_string())),
        )
        .expect("filter");

        let schema = assemble_schema("public", rows, &filter, &NoHooks)
            .await
            .expect("assemble");
        let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn check_values_win_over_native_labels() {
        let mut raw = row("orders", RelationKind::Table, "status", 1);
        raw.check_constraints = vec!["(status IN ('a', 'b'))".to_string()];
        raw.enum_labels = vec!["z".to_string()];
        assert_eq!(describe_column(raw.clone()).enum_values, vec!["a", "b"]);

        raw.check_constraints.clear();
        raw.data_type = "order_status".to_string();
        let column = describe_column(raw);
        assert_eq!(column.enum_values, vec!["z"]);
        assert_eq!(column.kind, FieldKind::String);
    }

    struct UppercaseDescriptions;

    #[async_trait]
    impl IntrospectHooks for UppercaseDescriptions {
        async fn column_descriptor(
            &self,
            mut column: ColumnDescriptor,
        ) -> std::result::Result<ColumnDescriptor, HookError> {
            column.raw.description = Some(column.name().to_uppercase());
            Ok(column)
        }

        async fn table_descriptor(
            &self,
            table: TableDescriptor,
        ) -> std::result::Result<TableDescriptor, HookError> {
            if table.name == "forbidden" {
                return Err("forbidden table".into());
            }
            Ok(table)
        }
    }

    #[tokio::test]
    async fn hooks_run_per_column_and_per_table() {
        let schema = assemble_schema(
            "public",
            vec![row("users", RelationKind::Table, "email", 1)],
            &TableFilter::default(),
            &UppercaseDescriptions,
        )
        .await
        .expect("assemble");
        assert_eq!(
            schema.tables[0].columns[0].raw.description.as_deref(),
            Some("EMAIL")
        );

        let err = assemble_schema(
            "public",
            vec![row("forbidden", RelationKind::Table, "id", 1)],
            &TableFilter::default(),
            &UppercaseDescriptions,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Hook(_)));
        assert_eq!(err.to_string(), "forbidden table");
    }
}
