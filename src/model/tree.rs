//! Read-only document tree consumed by the Markdown extractor.

/// A node of a loaded office document.
///
/// Produced by a document reader (see [`crate::reader`]) and only ever
/// read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A paragraph
    Paragraph(Vec<Node>),

    /// A heading with its outline level
    Heading {
        /// Heading level (1-6)
        level: u8,
        /// Child nodes
        children: Vec<Node>,
    },

    /// An inline span
    Span(Vec<Node>),

    /// A list; its items are [`Node::ListItem`] children
    List(Vec<Node>),

    /// A list item
    ListItem(Vec<Node>),

    /// A table; its contents are never inspected
    Table(Vec<Node>),

    /// Character data
    Text(String),

    /// Any other container
    Other(Vec<Node>),
}

impl Node {
    /// Create a text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Create a heading node.
    pub fn heading(level: u8, children: Vec<Node>) -> Self {
        Node::Heading {
            level: level.clamp(1, 6),
            children,
        }
    }

    /// Child nodes; empty for text leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Paragraph(children)
            | Node::Heading { children, .. }
            | Node::Span(children)
            | Node::List(children)
            | Node::ListItem(children)
            | Node::Table(children)
            | Node::Other(children) => children,
            Node::Text(_) => &[],
        }
    }

    /// Total number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Node::node_count).sum::<usize>()
    }
}
