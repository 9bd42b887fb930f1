//! Markdown-like text extraction from a loaded document tree.

use crate::model::Node;

/// Placeholder emitted for every table, whatever its contents.
pub const TABLE_PLACEHOLDER: &str = "\n| Table |\n| --- |\n\n";

/// Convert a document tree to Markdown-like text.
pub fn to_markdown(root: &Node) -> String {
    MarkdownExtractor::new().extract(root)
}

/// Depth-first extractor.
///
/// One pre-order pass over the tree; the output buffer only grows.
/// Unknown containers are transparent, so extraction never fails.
#[derive(Debug, Default)]
pub struct MarkdownExtractor {
    out: String,
}

impl MarkdownExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract `root` and return the accumulated text.
    pub fn extract(mut self, root: &Node) -> String {
        self.visit(root, 0);
        self.out
    }

    fn visit(&mut self, node: &Node, depth: usize) {
        match node {
            Node::Text(text) => self.out.push_str(text),
            Node::Paragraph(children) => {
                self.visit_all(children, depth);
                self.out.push('\n');
            }
            Node::Heading { level, children } => {
                self.out.push_str(&"#".repeat(*level as usize));
                self.out.push(' ');
                self.visit_all(children, depth);
                self.out.push('\n');
            }
            Node::List(children) => self.visit_list(children, depth),
            Node::Table(_) => self.out.push_str(TABLE_PLACEHOLDER),
            Node::Span(children) | Node::ListItem(children) | Node::Other(children) => {
                self.visit_all(children, depth)
            }
        }
    }

    fn visit_all(&mut self, children: &[Node], depth: usize) {
        for child in children {
            self.visit(child, depth);
        }
    }

    fn visit_list(&mut self, children: &[Node], depth: usize) {
        for child in children {
            match child {
                Node::ListItem(item) => {
                    let mut inner = MarkdownExtractor::new();
                    inner.visit_all(item, depth + 1);

                    self.out.push_str(&"  ".repeat(depth));
                    self.out.push_str("- ");
                    self.out.push_str(inner.out.trim_end());
                    self.out.push('\n');
                }
                // Anything else inside a list is transparent.
                other => self.visit(other, depth),
            }
        }
    }
}
