//! Block assembly: events in, document body out.

use crate::convert::{ConversionStats, ConvertOptions};
use crate::embed::{EmbedOutcome, ImageEmbedder};
use crate::model::{DocumentBody, DocumentNode, Heading, Paragraph, TextRun};

use super::events::{Attributes, Event, Tag};
use super::styles::StyleResolver;

/// The block currently receiving text runs.
#[derive(Debug, Clone)]
enum OpenBlock {
    Paragraph(Paragraph),
    Heading(Heading),
}

impl OpenBlock {
    fn add_run(&mut self, run: TextRun) {
        match self {
            OpenBlock::Paragraph(p) => p.add_run(run),
            OpenBlock::Heading(h) => h.add_run(run),
        }
    }

    fn has_runs(&self) -> bool {
        match self {
            OpenBlock::Paragraph(p) => !p.runs.is_empty(),
            OpenBlock::Heading(h) => !h.runs.is_empty(),
        }
    }
}

impl From<OpenBlock> for DocumentNode {
    fn from(block: OpenBlock) -> Self {
        match block {
            OpenBlock::Paragraph(p) => DocumentNode::Paragraph(p),
            OpenBlock::Heading(h) => DocumentNode::Heading(h),
        }
    }
}

/// Builds a [`DocumentBody`] from a stream of events in one linear pass.
///
/// Block rules:
/// - `p`/`div`/`h1`-`h6` start opens a new block, discarding any block
///   that was still open (improperly nested block tags lose content).
/// - the matching end tags append the open block to the body.
/// - `br` closes the open block and opens a fresh paragraph.
/// - `img` closes the open block, appends an image frame if the embedder
///   produced one, and opens a fresh paragraph either way.
pub struct BlockAssembler<'a> {
    styles: StyleResolver<'a>,
    embedder: ImageEmbedder<'a>,
    current: Option<OpenBlock>,
    body: DocumentBody,
    stats: ConversionStats,
}

impl<'a> BlockAssembler<'a> {
    /// Create an assembler for the given options.
    pub fn new(options: &'a ConvertOptions) -> Self {
        Self {
            styles: StyleResolver::new(&options.colors),
            embedder: ImageEmbedder::new(options),
            current: None,
            body: DocumentBody::new(),
            stats: ConversionStats::new(),
        }
    }

    /// Feed every event of an iterator.
    pub fn feed_all<I: IntoIterator<Item = Event>>(&mut self, events: I) {
        for event in events {
            self.feed(event);
        }
    }

    /// Feed a single event.
    pub fn feed(&mut self, event: Event) {
        match event {
            Event::Start(tag, attrs) => self.start(tag, &attrs),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(text),
        }
    }

    /// Finish assembly.
    ///
    /// A block still open at end of input is kept if it holds text, so
    /// trailing content after the last block tag is not lost.
    pub fn finish(mut self) -> (DocumentBody, ConversionStats) {
        if let Some(block) = self.current.take() {
            if block.has_runs() {
                self.append(block.into());
            }
        }
        if !self.styles.stack().is_empty() {
            log::debug!(
                "Style stack not balanced at end of input ({} open)",
                self.styles.stack().depth()
            );
        }
        (self.body, self.stats)
    }

    fn start(&mut self, tag: Tag, attrs: &Attributes) {
        match tag {
            Tag::P | Tag::Div => self.open(OpenBlock::Paragraph(Paragraph::new())),
            Tag::Heading(level) => self.open(OpenBlock::Heading(Heading::new(level))),
            Tag::Br => {
                self.flush();
                self.current = Some(OpenBlock::Paragraph(Paragraph::new()));
            }
            Tag::Img => {
                self.flush();
                self.image(attrs.src.as_deref().unwrap_or_default());
                self.current = Some(OpenBlock::Paragraph(Paragraph::new()));
            }
            Tag::Strong | Tag::B | Tag::Em | Tag::I | Tag::Span | Tag::Mark => {
                self.styles.start(tag, attrs);
            }
        }
    }

    fn end(&mut self, tag: Tag) {
        if tag.is_block() {
            self.flush();
        } else {
            self.styles.end(tag);
        }
    }

    fn text(&mut self, text: String) {
        if text.trim().is_empty() {
            return;
        }
        let run = TextRun::styled(text, self.styles.effective().cloned());
        self.stats.add_run();
        self.current
            .get_or_insert_with(|| OpenBlock::Paragraph(Paragraph::new()))
            .add_run(run);
    }

    fn image(&mut self, src: &str) {
        match self.embedder.embed(src) {
            EmbedOutcome::Embedded(frame) => {
                self.stats.add_image();
                self.body.push(frame.into());
            }
            EmbedOutcome::Skipped(_) => self.stats.skip_image(),
        }
    }

    fn open(&mut self, block: OpenBlock) {
        if let Some(previous) = self.current.replace(block) {
            if previous.has_runs() {
                log::debug!("Discarding unclosed block before new block tag");
            }
        }
    }

    fn flush(&mut self) {
        if let Some(block) = self.current.take() {
            self.append(block.into());
        }
    }

    fn append(&mut self, node: DocumentNode) {
        match &node {
            DocumentNode::Paragraph(_) => self.stats.add_paragraph(),
            DocumentNode::Heading(_) => self.stats.add_heading(),
            DocumentNode::Image(_) => {}
        }
        self.body.push(node);
    }
}

/// Assemble a document body from HTML.
pub fn assemble(html: &str, options: &ConvertOptions) -> (DocumentBody, ConversionStats) {
    let mut assembler = BlockAssembler::new(options);
    assembler.feed_all(super::tokenize(html));
    assembler.finish()
}
