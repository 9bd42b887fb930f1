//! Forward path: rendered HTML to a document body.
//!
//! [`tokenize`] turns markup into [`Event`]s, a [`StyleResolver`] tracks
//! inline formatting, and the [`BlockAssembler`] folds both into
//! paragraphs, headings and image frames.

mod assembler;
mod events;
mod styles;

pub use assembler::{assemble, BlockAssembler};
pub use events::{tokenize, Attributes, Event, Tag};
pub use styles::{StyleResolver, StyleStack, HIGHLIGHT_CLASS, HIGHLIGHT_COLOR_PREFIX};
