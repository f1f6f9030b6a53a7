//! Validation-schema generation for pgzod.
//!
//! Turns introspected table descriptors into column/table models, renders
//! them for the configured dialect and emits one TypeScript module per table.

pub mod emit;
pub mod engine;
pub mod hooks;
pub mod model;
pub mod naming;
pub mod output;
pub mod progress;
pub mod render;

pub use emit::{RenderedTable, emit_index, emit_table};
pub use engine::{GenerationReport, Generator, TableReport};
pub use hooks::{ModelHooks, NoopHooks};
pub use model::{
    ColumnModel, EnumDefinition, EnumValue, JsonSchemaImport, ModelBuilder, TableModel,
    TableNames,
};
pub use naming::{Naming, Operation, apply_casing, pluralize, singularize};
pub use output::{FsWriter, INDEX_FILE, MemoryWriter, OutputWriter};
pub use progress::{
    NoopProgress, ProgressEvent, ProgressReporter, RecordingProgress, TracingProgress,
};
pub use render::{DialectProfile, RenderOptions, Renderer};
