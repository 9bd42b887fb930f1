//! Conversion pipeline from HTML to a serialized document.
//!
//! A [`Converter`] owns immutable [`ConvertOptions`] and runs each
//! conversion with its own assembler state, so one converter can be
//! shared across threads.
//!
//! # Example
//!
//! ```no_run
//! use markodt::convert::{ConvertOptions, Converter};
//!
//! fn main() -> markodt::Result<()> {
//!     let options = ConvertOptions::new().with_color("gray", "#E0E0E0");
//!     let converter = Converter::new(options)?;
//!
//!     let artifact = converter.convert("<h1>Notes</h1><p>Hello</p>")?;
//!     println!("{} paragraphs", artifact.stats().paragraph_count);
//!     artifact.persist("notes.fodt")?;
//!     Ok(())
//! }
//! ```

mod options;
mod result;

pub use options::{
    ColorTable, ConvertOptions, DEFAULT_DPI, DEFAULT_IMAGE_DIR, DEFAULT_MAX_WIDTH_IN,
    DEFAULT_ROUTE_PREFIX,
};
pub use result::{ConversionOutput, ConversionStats, OutputArtifact};

use crate::error::Result;
use crate::html;
use crate::serialize::{emit_body, DocumentSerializer, FlatOdtWriter};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Temporary output file name parts.
const TEMP_PREFIX: &str = "markodt-";
const TEMP_SUFFIX: &str = ".fodt";

/// HTML to document converter.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter after validating `options`.
    pub fn new(options: ConvertOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options this converter runs with.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Assemble the document body without serializing it.
    pub fn to_body(&self, html: &str) -> ConversionOutput {
        let (body, stats) = html::assemble(html, &self.options);
        ConversionOutput::new(body, stats)
    }

    /// Convert HTML into a flat ODF text document.
    pub fn convert(&self, html: &str) -> Result<OutputArtifact> {
        let mut writer = FlatOdtWriter::new();
        self.convert_with(html, &mut writer)
    }

    /// Convert HTML through any serializer.
    ///
    /// The document is saved to a fresh temporary file. If emitting or
    /// saving fails, the temporary file is removed before the error is
    /// returned.
    pub fn convert_with<S>(&self, html: &str, serializer: &mut S) -> Result<OutputArtifact>
    where
        S: DocumentSerializer + ?Sized,
    {
        let ConversionOutput { body, mut stats } = self.to_body(html);

        let temp = self.temp_file()?;
        let summary = emit_body(&body, &self.options.colors, serializer)?;
        serializer.save(temp.path())?;

        stats.image_count = stats.image_count.saturating_sub(summary.frames_skipped);
        stats.skipped_image_count += summary.frames_skipped;

        log::debug!(
            "Converted {} blocks ({} images, {} skipped)",
            body.block_count(),
            stats.image_count,
            stats.skipped_image_count
        );
        Ok(OutputArtifact::new(temp, stats))
    }

    /// Convert an HTML file and write the document to `output`.
    pub fn convert_file(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<PathBuf> {
        let html = std::fs::read_to_string(input.as_ref())?;
        self.convert(&html)?.persist(output)
    }

    /// Convert independent documents in parallel.
    ///
    /// Results are returned in input order; one failure does not affect
    /// the others.
    pub fn convert_many<S>(&self, documents: &[S]) -> Vec<Result<OutputArtifact>>
    where
        S: AsRef<str> + Sync,
    {
        documents
            .par_iter()
            .map(|html| self.convert(html.as_ref()))
            .collect()
    }

    fn temp_file(&self) -> Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX).suffix(TEMP_SUFFIX);
        let file = match &self.options.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        Ok(file)
    }
}
