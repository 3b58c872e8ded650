//! # Output File Handling
//!
//! The output file is opened in truncate mode, written block by block
//! through a `BufWriter`, flushed and synced. The handle is owned by
//! [`OutputFile`] and closed when it goes out of scope, so every early
//! return releases it.
//!
//! A failure after opening may leave a partially written file behind.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::declarations::{module_footer, module_header, RenderContext, ALL_DECLARATIONS};
use crate::errors::{DefsError, DefsResult};

/// Write the whole module to `out`. Returns the number of bytes written.
pub fn emit_declarations<W: Write>(out: &mut W, ctx: &RenderContext) -> io::Result<usize> {
    let mut written = 0;

    let header = module_header();
    out.write_all(header.as_bytes())?;
    written += header.len();

    for declaration in ALL_DECLARATIONS {
        let block = declaration.render(ctx);
        out.write_all(block.as_bytes())?;
        written += block.len();
        debug!("emitted {} ({} bytes)", declaration.julia_name(), block.len());
    }

    let footer = module_footer();
    out.write_all(footer.as_bytes())?;
    written += footer.len();

    Ok(written)
}

/// Exclusively owned, write-only handle on the generated file.
pub struct OutputFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl OutputFile {
    /// Create or truncate `path`.
    pub fn create(path: &Path) -> DefsResult<Self> {
        let file = File::create(path).map_err(|e| {
            DefsError::file_error("open for writing", path.display().to_string(), e.to_string())
        })?;
        Ok(OutputFile {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Emit every declaration block.
    pub fn write_declarations(&mut self, ctx: &RenderContext) -> DefsResult<usize> {
        emit_declarations(&mut self.writer, ctx).map_err(|e| {
            DefsError::file_error("write", self.path.display().to_string(), e.to_string())
        })
    }

    /// Push buffered output to the file.
    pub fn flush(&mut self) -> DefsResult<()> {
        self.writer.flush().map_err(|e| {
            DefsError::file_error("flush", self.path.display().to_string(), e.to_string())
        })
    }

    /// Sync and close the file.
    ///
    /// Dropping a `File` discards close errors, so deferred write-back
    /// failures are surfaced through `sync_all` before the handle is released.
    pub fn close(self) -> DefsResult<()> {
        let path = self.path;
        let file = self.writer.into_inner().map_err(|e| {
            DefsError::file_error("flush", path.display().to_string(), e.error().to_string())
        })?;
        file.sync_all().map_err(|e| {
            DefsError::file_error("close", path.display().to_string(), e.to_string())
        })?;
        drop(file);
        Ok(())
    }
}
