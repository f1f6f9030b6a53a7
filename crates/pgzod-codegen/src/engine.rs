use std::collections::BTreeSet;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use pgzod_core::{Error, GeneratorConfig, IntrospectHooks, RelationKind, Result};
use pgzod_introspect::Connector;

use crate::emit::{emit_index, emit_table};
use crate::hooks::ModelHooks;
use crate::model::ModelBuilder;
use crate::output::OutputWriter;
use crate::progress::{ProgressEvent, ProgressReporter};

/// Summary of one generated module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub schema: String,
    pub table: String,
    pub kind: RelationKind,
    pub file_name: String,
    pub columns: usize,
    pub writable_columns: usize,
    pub enums: usize,
}

/// Report for a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub schema: String,
    pub dialect: String,
    pub tables: Vec<TableReport>,
}

/// Runs the whole pipeline: fetch, model, emit, write.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate one module per matched relation.
    ///
    /// Tables are processed sequentially in descriptor order. When the filters
    /// leave nothing, `Done` is still reported and `NoTablesMatched` returned.
    pub async fn run(
        &self,
        connector: &dyn Connector,
        introspect_hooks: &dyn IntrospectHooks,
        model_hooks: &dyn ModelHooks,
        writer: &mut dyn OutputWriter,
        progress: &dyn ProgressReporter,
    ) -> Result<GenerationReport> {
        let start = Instant::now();
        self.config.validate()?;
        let builder = ModelBuilder::from_config(&self.config);
        let profile = builder.renderer().profile();

        progress.report(ProgressEvent::Connecting);
        progress.report(ProgressEvent::FetchingSchema);
        let schema = connector
            .fetch_schema(
                &self.config.connection,
                &self.config.schema,
                &self.config.filter,
                introspect_hooks,
            )
            .await?;

        let table_count = schema.tables.len();
        progress.report(ProgressEvent::Generating {
            tables: table_count,
        });
        info!(
            engine = connector.engine(),
            schema = %schema.name,
            tables = table_count,
            "generation started"
        );

        let mut report = GenerationReport {
            schema: schema.name.clone(),
            dialect: format!("{:?}", self.config.dialect),
            tables: Vec::with_capacity(table_count),
        };
        let mut index_lines = Vec::with_capacity(table_count);
        let mut file_names = BTreeSet::new();

        // Collisions are rejected before the output directory is touched.
        for table in &schema.tables {
            let module = builder.naming().file_name(&table.name);
            if !file_names.insert(module.clone()) {
                return Err(duplicate_file_name(&table.name, &module));
            }
        }
        file_names.clear();

        for table in &schema.tables {
            if report.tables.is_empty() {
                writer.prepare()?;
            }

            let model = builder.build_table_model(table, model_hooks).await?;
            let rendered = emit_table(&model, profile);
            let rendered = model_hooks
                .rendered(&model, rendered)
                .await
                .map_err(Error::hook)?;
            if !file_names.insert(rendered.file_name.clone()) {
                return Err(duplicate_file_name(&model.table_name, &rendered.file_name));
            }
            writer.write_table(&rendered)?;

            info!(
                schema = %model.schema_name,
                table = %model.table_name,
                file = %rendered.file_name,
                columns = model.columns.len(),
                "table generated"
            );
            index_lines.push(rendered.index_line);
            report.tables.push(TableReport {
                schema: model.schema_name.clone(),
                table: model.table_name.clone(),
                kind: model.kind,
                file_name: rendered.file_name,
                columns: model.columns.len(),
                writable_columns: model.writable_columns.len(),
                enums: model.enums.len(),
            });
        }

        if !index_lines.is_empty() {
            writer.write_index(&emit_index(index_lines.iter().map(String::as_str)))?;
        }

        progress.report(ProgressEvent::Done);
        info!(
            tables = report.tables.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "generation finished"
        );

        if report.tables.is_empty() {
            warn!(schema = %self.config.schema, "no tables matched the configured filters");
            return Err(Error::NoTablesMatched {
                schema: self.config.schema.clone(),
            });
        }

        Ok(report)
    }
}

fn duplicate_file_name(table: &str, file_name: &str) -> Error {
    warn!(table = %table, file = %file_name, "module file name already used");
    Error::Configuration(format!(
        "relation {table} maps to module {file_name}, which another relation already uses; \
         exclude one of them"
    ))
}
