//! Flat ODF text reader.
//!
//! Builds the read-only [`Node`] tree the Markdown extractor walks. Only
//! the content of `office:text` is kept; styles, metadata and inline
//! binary payloads are skipped.

use crate::error::{Error, Result};
use crate::model::Node;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::path::Path;

/// Element kinds the reader builds nodes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Body,
    Paragraph,
    Heading(u8),
    Span,
    List,
    ListItem,
    Table,
    Other,
}

impl Kind {
    fn holds_text(self) -> bool {
        matches!(self, Kind::Paragraph | Kind::Heading(_) | Kind::Span)
    }

    fn into_node(self, children: Vec<Node>) -> Node {
        match self {
            Kind::Paragraph => Node::Paragraph(children),
            Kind::Heading(level) => Node::heading(level, children),
            Kind::Span => Node::Span(children),
            Kind::List => Node::List(children),
            Kind::ListItem => Node::ListItem(children),
            Kind::Table => Node::Table(children),
            Kind::Body | Kind::Other => Node::Other(children),
        }
    }
}

/// Elements whose whole subtree carries no document text.
fn is_skipped(name: &[u8]) -> bool {
    matches!(
        name,
        b"office:binary-data"
            | b"office:meta"
            | b"office:settings"
            | b"office:scripts"
            | b"office:font-face-decls"
            | b"office:styles"
            | b"office:automatic-styles"
            | b"office:master-styles"
            | b"text:sequence-decls"
    )
}

struct TreeBuilder {
    stack: Vec<(Kind, Vec<Node>)>,
    body: Option<Vec<Node>>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![(Kind::Other, Vec::new())],
            body: None,
        }
    }

    fn open(&mut self, kind: Kind) {
        self.stack.push((kind, Vec::new()));
    }

    fn close(&mut self) {
        // The root frame is never popped.
        if self.stack.len() < 2 {
            return;
        }
        if let Some((kind, children)) = self.stack.pop() {
            if kind == Kind::Body && self.body.is_none() {
                self.body = Some(children.clone());
            }
            self.push(kind.into_node(children));
        }
    }

    fn push(&mut self, node: Node) {
        if let Some((_, children)) = self.stack.last_mut() {
            children.push(node);
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let in_text = self.stack.last().is_some_and(|(kind, _)| kind.holds_text());
        if !in_text && text.trim().is_empty() {
            return;
        }
        // Merge adjacent character data so entity splits stay one leaf.
        if let Some((_, children)) = self.stack.last_mut() {
            if let Some(Node::Text(last)) = children.last_mut() {
                last.push_str(text);
                return;
            }
            children.push(Node::text(text));
        }
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.close();
        }
        match self.body {
            Some(children) => Node::Other(children),
            None => {
                let (_, children) = self.stack.pop().unwrap_or((Kind::Other, Vec::new()));
                Node::Other(children)
            }
        }
    }
}

/// Parse flat ODF text XML into a document tree.
///
/// The returned root is an [`Node::Other`] holding the children of
/// `office:text`, or of the whole document if there is no `office:text`.
pub fn read_flat_odt(xml: &str) -> Result<Node> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut builder = TreeBuilder::new();
    let mut skip_depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::Reader(format!(
                "malformed XML at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                if skip_depth > 0 || is_skipped(e.name().as_ref()) {
                    skip_depth += 1;
                    continue;
                }
                match inline_text(&reader, &e) {
                    Some(text) => {
                        // Whitespace elements are leaves; their content is ignored.
                        builder.text(&text);
                        skip_depth += 1;
                    }
                    None => builder.open(element_kind(&reader, &e)),
                }
            }
            Event::Empty(e) => {
                if skip_depth > 0 || is_skipped(e.name().as_ref()) {
                    continue;
                }
                match inline_text(&reader, &e) {
                    Some(text) => builder.text(&text),
                    None => {
                        builder.open(element_kind(&reader, &e));
                        builder.close();
                    }
                }
            }
            Event::End(_) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                } else {
                    builder.close();
                }
            }
            Event::Text(e) if skip_depth == 0 => {
                let text = e
                    .decode()
                    .map_err(|err| Error::Reader(format!("text decode: {}", err)))?;
                builder.text(&text);
            }
            Event::CData(e) if skip_depth == 0 => {
                let text = reader
                    .decoder()
                    .decode(&e)
                    .map_err(|err| Error::Reader(format!("cdata decode: {}", err)))?;
                builder.text(&text);
            }
            Event::GeneralRef(e) if skip_depth == 0 => {
                let name = e
                    .decode()
                    .map_err(|err| Error::Reader(format!("entity decode: {}", err)))?;
                let entity = format!("&{};", name);
                let resolved = quick_xml::escape::unescape(&entity)
                    .map_err(|err| Error::Reader(format!("entity {}: {}", entity, err)))?;
                builder.text(&resolved);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let tree = builder.finish();
    log::debug!("Read document tree with {} nodes", tree.node_count());
    Ok(tree)
}

/// Read a flat ODF text file into a document tree.
pub fn read_file(path: impl AsRef<Path>) -> Result<Node> {
    let xml = std::fs::read_to_string(path.as_ref())?;
    read_flat_odt(&xml)
}

fn element_kind(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Kind {
    match e.name().as_ref() {
        b"office:text" => Kind::Body,
        b"text:p" => Kind::Paragraph,
        b"text:h" => {
            let level = attribute(reader, e, b"text:outline-level")
                .and_then(|v| v.trim().parse::<u8>().ok())
                .unwrap_or(1);
            Kind::Heading(level.clamp(1, 6))
        }
        b"text:span" => Kind::Span,
        b"text:list" => Kind::List,
        b"text:list-item" | b"text:list-header" => Kind::ListItem,
        b"table:table" => Kind::Table,
        _ => Kind::Other,
    }
}

/// Text stood in for by ODF whitespace elements.
fn inline_text(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Option<String> {
    match e.name().as_ref() {
        b"text:s" => {
            let count = attribute(reader, e, b"text:c")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(1);
            Some(" ".repeat(count))
        }
        b"text:tab" => Some("\t".to_string()),
        b"text:line-break" => Some("\n".to_string()),
        _ => None,
    }
}

fn attribute(reader: &Reader<&[u8]>, e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| {
            reader
                .decoder()
                .decode(attr.value.as_ref())
                .ok()
                .map(|v| v.into_owned())
        })
}
