//! Rendering module for turning documents into text outputs.

mod json;
mod markdown;

pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownExtractor, TABLE_PLACEHOLDER};
