use async_trait::async_trait;

use pgzod_core::{HookError, IntrospectHooks};

use crate::emit::RenderedTable;
use crate::model::{ColumnModel, TableModel};

/// Hooks invoked while models are built and rendered.
///
/// Every method defaults to returning its input unchanged.
#[async_trait]
pub trait ModelHooks: Send + Sync {
    /// Called for each column after its base model is rendered.
    async fn column_model(&self, column: ColumnModel) -> Result<ColumnModel, HookError> {
        Ok(column)
    }

    /// Called once the table model is complete; may replace it entirely.
    async fn table_model(&self, table: TableModel) -> Result<TableModel, HookError> {
        Ok(table)
    }

    /// Called with the emitted module; may override the output.
    async fn rendered(
        &self,
        _table: &TableModel,
        output: RenderedTable,
    ) -> Result<RenderedTable, HookError> {
        Ok(output)
    }
}

/// Hooks that change nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl IntrospectHooks for NoopHooks {}

impl ModelHooks for NoopHooks {}
