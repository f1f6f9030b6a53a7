use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use pgzod_core::Result;

use super::OutputWriter;
use crate::emit::RenderedTable;

pub const INDEX_FILE: &str = "index.ts";

/// Writes modules as `<out_dir>/<file>.ts` plus `<out_dir>/index.ts`.
#[derive(Debug, Clone)]
pub struct FsWriter {
    out_dir: PathBuf,
    clean: bool,
    written: Vec<PathBuf>,
}

impl FsWriter {
    pub fn new(out_dir: impl Into<PathBuf>, clean: bool) -> Self {
        Self {
            out_dir: out_dir.into(),
            clean,
            written: Vec::new(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Paths written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_file(&mut self, name: &str, content: &str) -> Result<()> {
        let path = self.out_dir.join(name);
        fs::write(&path, content)?;
        debug!(path = %path.display(), bytes = content.len(), "module written");
        self.written.push(path);
        Ok(())
    }
}

impl OutputWriter for FsWriter {
    fn prepare(&mut self) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        if self.clean {
            let removed = remove_generated_modules(&self.out_dir)?;
            debug!(dir = %self.out_dir.display(), removed, "output directory cleaned");
        }
        Ok(())
    }

    fn write_table(&mut self, table: &RenderedTable) -> Result<()> {
        self.write_file(&table.file_name, &table.content)
    }

    fn write_index(&mut self, content: &str) -> Result<()> {
        self.write_file(INDEX_FILE, content)
    }
}

/// Remove top-level `.ts` files; subdirectories and other files are kept.
fn remove_generated_modules(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "ts") {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}
