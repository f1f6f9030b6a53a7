use async_trait::async_trait;

use pgzod_core::{ConnectionConfig, FilterConfig, IntrospectHooks, Result, SchemaDescriptor};

/// Implemented by database backends that can produce a schema descriptor.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Read the catalog of `schema`, apply the filters and return its relations.
    ///
    /// Implementations own their connection and release it on every exit path.
    async fn fetch_schema(
        &self,
        connection: &ConnectionConfig,
        schema: &str,
        filter: &FilterConfig,
        hooks: &dyn IntrospectHooks,
    ) -> Result<SchemaDescriptor>;
}
