//! Destinations for emitted modules.

mod fs;
mod memory;

pub use fs::{FsWriter, INDEX_FILE};
pub use memory::MemoryWriter;

use pgzod_core::Result;

use crate::emit::RenderedTable;

/// Receives emitted modules in table order.
///
/// `prepare` is called once, right before the first `write_table`; when no
/// table is generated it is never called and nothing is touched.
pub trait OutputWriter: Send {
    fn prepare(&mut self) -> Result<()>;

    fn write_table(&mut self, table: &RenderedTable) -> Result<()>;

    /// Write the index module re-exporting every table module.
    fn write_index(&mut self, content: &str) -> Result<()>;
}
