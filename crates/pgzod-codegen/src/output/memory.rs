use std::collections::BTreeMap;

use pgzod_core::Result;

use super::OutputWriter;
use crate::emit::RenderedTable;

/// Keeps emitted modules in memory, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    pub files: BTreeMap<String, String>,
    pub prepared: bool,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }
}

impl OutputWriter for MemoryWriter {
    fn prepare(&mut self) -> Result<()> {
        self.files.clear();
        self.prepared = true;
        Ok(())
    }

    fn write_table(&mut self, table: &RenderedTable) -> Result<()> {
        self.files
            .insert(table.file_name.clone(), table.content.clone());
        Ok(())
    }

    fn write_index(&mut self, content: &str) -> Result<()> {
        self.files
            .insert(super::INDEX_FILE.to_string(), content.to_string());
        Ok(())
    }
}
