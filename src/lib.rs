//! # markodt
//!
//! Converts Markdown-rendered HTML into office documents and reads office
//! documents back as Markdown-like text.
//!
//! ## Quick Start
//!
//! ```no_run
//! use markodt::{convert_html, extract_markdown_from_file, ConvertOptions};
//!
//! fn main() -> markodt::Result<()> {
//!     // HTML produced by a Markdown renderer
//!     let html = r#"<h2>Title</h2><p>Some <mark data-color="yellow">marked</mark> text</p>"#;
//!
//!     // Forward: HTML to a flat ODF text document
//!     let artifact = convert_html(html, &ConvertOptions::default())?;
//!     let saved = artifact.persist("notes.fodt")?;
//!
//!     // Reverse: document back to text
//!     let text = extract_markdown_from_file(&saved)?;
//!     println!("{}", text);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Inline styles**: bold, italic and configurable highlight colors
//! - **Images**: local images measured and scaled to print width
//! - **Pluggable output**: any [`DocumentSerializer`] can receive the body
//! - **Batch conversion**: uses Rayon to convert documents in parallel
//! - **Scoped output**: temporary artifacts are removed on every error path

pub mod convert;
pub mod embed;
pub mod error;
pub mod html;
pub mod model;
pub mod reader;
pub mod render;
pub mod serialize;

// Re-export commonly used types
pub use convert::{
    ColorTable, ConversionOutput, ConversionStats, ConvertOptions, Converter, OutputArtifact,
};
pub use embed::{EmbedOutcome, ImageEmbedder, SkipReason};
pub use error::{Error, Result};
pub use model::{
    DocumentBody, DocumentNode, Heading, ImageFrame, InlineStyle, Node, Paragraph, TextRun,
};
pub use render::{to_json, to_markdown, JsonFormat};
pub use serialize::{DocumentSerializer, FlatOdtWriter};

use std::path::{Path, PathBuf};

/// Assemble a document body from HTML.
///
/// Never fails: malformed markup and unusable images are skipped.
///
/// # Example
///
/// ```
/// use markodt::{html_to_body, ConvertOptions};
///
/// let output = html_to_body("<h1>Hi</h1><p>there</p>", &ConvertOptions::default());
/// assert_eq!(output.body.len(), 2);
/// ```
pub fn html_to_body(html: &str, options: &ConvertOptions) -> ConversionOutput {
    let (body, stats) = html::assemble(html, options);
    ConversionOutput::new(body, stats)
}

/// Convert HTML into a flat ODF text document held in a temporary file.
pub fn convert_html(html: &str, options: &ConvertOptions) -> Result<OutputArtifact> {
    Converter::new(options.clone())?.convert(html)
}

/// Convert HTML and write the document to `output`.
pub fn convert_html_to_file<P: AsRef<Path>>(
    html: &str,
    options: &ConvertOptions,
    output: P,
) -> Result<PathBuf> {
    convert_html(html, options)?.persist(output)
}

/// Extract Markdown-like text from flat ODF text XML.
///
/// # Example
///
/// ```
/// let xml = r#"<office:text><text:h text:outline-level="2">Title</text:h></office:text>"#;
/// assert_eq!(markodt::extract_markdown(xml).unwrap(), "## Title\n");
/// ```
pub fn extract_markdown(xml: &str) -> Result<String> {
    let tree = reader::read_flat_odt(xml)?;
    Ok(render::to_markdown(&tree))
}

/// Extract Markdown-like text from a flat ODF text file.
pub fn extract_markdown_from_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let tree = reader::read_file(path)?;
    Ok(render::to_markdown(&tree))
}
