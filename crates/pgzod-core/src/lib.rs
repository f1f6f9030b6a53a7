//! Core contracts shared by the pgzod crates.
//!
//! Defines the catalog descriptors, the error taxonomy, the resolved
//! configuration, relation filters and the descriptor hooks.

pub mod config;
pub mod error;
pub mod filter;
pub mod hooks;
pub mod redaction;
pub mod schema;

pub use config::{
    Casing, ConnectionConfig, DEFAULT_PORT, DEFAULT_SCHEMA, Dialect, FilterConfig, FilterSpec,
    GeneratorConfig, StringTransforms,
};
pub use error::{Error, HookError, Result};
pub use filter::{NameMatcher, TableFilter};
pub use hooks::IntrospectHooks;
pub use redaction::{describe_connection, redact_connection_string};
pub use schema::{
    ColumnDescriptor, FieldKind, RawColumnDescriptor, RelationKind, SchemaDescriptor,
    TableDescriptor,
};
