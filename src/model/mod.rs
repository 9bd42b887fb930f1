//! Document model types.
//!
//! Two models live here. The forward conversion builds a flat
//! [`DocumentBody`] of paragraphs, headings and image frames. The reverse
//! extraction reads a nested [`Node`] tree produced by a document reader.

mod document;
mod paragraph;
mod tree;

pub use document::{DocumentBody, DocumentNode, ImageFrame};
pub use paragraph::{Heading, InlineStyle, Paragraph, TextRun};
pub use tree::Node;
