use async_trait::async_trait;

use crate::error::HookError;
use crate::schema::{ColumnDescriptor, TableDescriptor};

/// Hooks invoked by connectors while descriptors are assembled.
///
/// Both methods default to returning their input unchanged.
#[async_trait]
pub trait IntrospectHooks: Send + Sync {
    /// Called for each column right after it is classified.
    async fn column_descriptor(
        &self,
        column: ColumnDescriptor,
    ) -> Result<ColumnDescriptor, HookError> {
        Ok(column)
    }

    /// Called for each table once all of its columns are grouped.
    async fn table_descriptor(&self, table: TableDescriptor) -> Result<TableDescriptor, HookError> {
        Ok(table)
    }
}
