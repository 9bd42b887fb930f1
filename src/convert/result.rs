//! Conversion results and statistics.

use crate::error::Result;
use crate::model::DocumentBody;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, PersistError};

/// A document body together with the statistics of building it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The assembled body
    pub body: DocumentBody,

    /// Conversion statistics
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Create a new conversion output.
    pub fn new(body: DocumentBody, stats: ConversionStats) -> Self {
        Self { body, stats }
    }
}

/// Statistics collected during a forward conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Number of paragraphs appended
    pub paragraph_count: u32,

    /// Number of headings appended
    pub heading_count: u32,

    /// Number of text runs captured
    pub run_count: u32,

    /// Number of images embedded
    pub image_count: u32,

    /// Number of images skipped (remote, missing or unreadable)
    pub skipped_image_count: u32,
}

impl ConversionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    /// Increment heading count.
    pub fn add_heading(&mut self) {
        self.heading_count += 1;
    }

    /// Increment run count.
    pub fn add_run(&mut self) {
        self.run_count += 1;
    }

    /// Increment embedded image count.
    pub fn add_image(&mut self) {
        self.image_count += 1;
    }

    /// Increment skipped image count.
    pub fn skip_image(&mut self) {
        self.skipped_image_count += 1;
    }
}

/// A serialized document waiting in a temporary file.
///
/// The file is deleted when the artifact is dropped unless it was
/// [persisted](OutputArtifact::persist) first.
#[derive(Debug)]
pub struct OutputArtifact {
    file: NamedTempFile,
    stats: ConversionStats,
}

impl OutputArtifact {
    pub(crate) fn new(file: NamedTempFile, stats: ConversionStats) -> Self {
        Self { file, stats }
    }

    /// Path of the temporary file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Conversion statistics.
    pub fn stats(&self) -> &ConversionStats {
        &self.stats
    }

    /// Read the serialized document.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.file.path())?)
    }

    /// Read the serialized document as text.
    pub fn read_to_string(&self) -> Result<String> {
        Ok(std::fs::read_to_string(self.file.path())?)
    }

    /// Move the document to a permanent location.
    ///
    /// When `dest` is on another filesystem than the temporary file, the
    /// document is copied instead and the temporary file is removed.
    pub fn persist(self, dest: impl AsRef<Path>) -> Result<PathBuf> {
        let dest = dest.as_ref();
        match self.file.persist(dest) {
            Ok(_) => {}
            Err(err) if err.error.kind() == io::ErrorKind::CrossesDevices => {
                copy_out(err, dest)?;
            }
            Err(err) => return Err(err.into()),
        }
        Ok(dest.to_path_buf())
    }
}

/// Copy a temporary file whose rename failed; the temp file drops afterwards.
fn copy_out(err: PersistError, dest: &Path) -> Result<()> {
    log::debug!(
        "Rename to {} failed ({}), copying instead",
        dest.display(),
        err.error
    );
    fs::copy(err.file.path(), dest)?;
    Ok(())
}
