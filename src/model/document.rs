//! Document-level types for the forward conversion.

use super::{Heading, Paragraph};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The body of a converted document: an ordered list of nodes.
///
/// Nodes are only ever appended; once a node is in the body it is not
/// touched again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentBody {
    /// Nodes in document order
    pub nodes: Vec<DocumentNode>,
}

impl DocumentBody {
    /// Create a new empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node.
    pub fn push(&mut self, node: DocumentNode) {
        self.nodes.push(node);
    }

    /// Number of nodes in the body.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the body has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over the image frames placed directly in the body.
    pub fn images(&self) -> impl Iterator<Item = &ImageFrame> {
        self.nodes.iter().filter_map(|node| match node {
            DocumentNode::Image(frame) => Some(frame),
            _ => None,
        })
    }

    /// Number of paragraph and heading nodes.
    pub fn block_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| !matches!(node, DocumentNode::Image(_)))
            .count()
    }

    /// Get plain text content of the body, one line per block.
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                DocumentNode::Paragraph(p) => Some(p.plain_text()),
                DocumentNode::Heading(h) => Some(h.plain_text()),
                DocumentNode::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A node of the document body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentNode {
    /// A paragraph
    Paragraph(Paragraph),

    /// A heading
    Heading(Heading),

    /// An image frame placed directly in the body
    Image(ImageFrame),
}

impl From<Paragraph> for DocumentNode {
    fn from(p: Paragraph) -> Self {
        DocumentNode::Paragraph(p)
    }
}

impl From<Heading> for DocumentNode {
    fn from(h: Heading) -> Self {
        DocumentNode::Heading(h)
    }
}

impl From<ImageFrame> for DocumentNode {
    fn from(frame: ImageFrame) -> Self {
        DocumentNode::Image(frame)
    }
}

/// A positioned container holding an embedded image with print dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFrame {
    /// Local path of the image file
    pub path: PathBuf,

    /// Print width in inches
    pub width_in: f64,

    /// Print height in inches
    pub height_in: f64,
}

impl ImageFrame {
    /// Create a new image frame.
    pub fn new(path: impl Into<PathBuf>, width_in: f64, height_in: f64) -> Self {
        Self {
            path: path.into(),
            width_in,
            height_in,
        }
    }
}
