//! Catalog introspection for pgzod.
//!
//! Reads column metadata from the database, recovers enum value sets from
//! CHECK clauses and classifies each column into a semantic field kind.

pub mod check_clause;
pub mod classify;
pub mod connector;
pub mod postgres;

pub use check_clause::extract_enum_values;
pub use classify::{Classification, classify};
pub use connector::Connector;
pub use postgres::{PostgresConnector, assemble_schema, connect_options, describe_column};
