//! Document serializer seam.
//!
//! The converter never writes document bytes itself. It drives a
//! [`DocumentSerializer`] with the operations an office-document library
//! exposes: register styles, add paragraphs and headings made of styled
//! spans, embed image binaries and place them in frames, and save.
//!
//! [`FlatOdtWriter`] is the bundled implementation.

mod fodt;

pub use fodt::FlatOdtWriter;

use crate::convert::ColorTable;
use crate::error::Result;
use crate::model::{DocumentBody, DocumentNode, ImageFrame, InlineStyle, TextRun};
use std::path::Path;

/// Formatting carried by a registered text style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleProperties {
    /// Bold weight
    pub bold: bool,

    /// Italic posture
    pub italic: bool,

    /// Background (highlight) color, `#rrggbb`
    pub background_color: Option<String>,
}

impl StyleProperties {
    /// Bold text.
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Default::default()
        }
    }

    /// Italic text.
    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Default::default()
        }
    }

    /// Highlighted text.
    pub fn highlight(color: impl Into<String>) -> Self {
        Self {
            background_color: Some(color.into()),
            ..Default::default()
        }
    }
}

/// A piece of text with an optional registered style name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    /// Text content
    pub text: &'a str,

    /// Registered style name, `None` for plain text
    pub style_name: Option<String>,
}

impl<'a> Span<'a> {
    /// Build a span from a text run.
    pub fn from_run(run: &'a TextRun) -> Self {
        Self {
            text: &run.text,
            style_name: run.style_name(),
        }
    }
}

/// Opaque handle to an image binary registered with a serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(usize);

impl ImageHandle {
    /// Create a handle from a serializer-specific index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Serializer-specific index.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Operations the converter needs from an office-document writer.
pub trait DocumentSerializer {
    /// Register a named text style.
    fn register_style(&mut self, name: &str, properties: &StyleProperties) -> Result<()>;

    /// Append a paragraph made of spans.
    fn add_paragraph(&mut self, spans: &[Span<'_>]) -> Result<()>;

    /// Append a heading made of spans.
    fn add_heading(&mut self, level: u8, spans: &[Span<'_>]) -> Result<()>;

    /// Register an image binary with the document.
    fn embed_image(&mut self, path: &Path) -> Result<ImageHandle>;

    /// Place a registered image in a frame with print dimensions in inches.
    fn add_frame(&mut self, image: &ImageHandle, width_in: f64, height_in: f64) -> Result<()>;

    /// Write the document to `path`.
    fn save(&mut self, path: &Path) -> Result<()>;
}

/// What happened to the image frames while emitting a body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    /// Frames placed in the document
    pub frames_written: u32,

    /// Frames dropped because the serializer rejected the image
    pub frames_skipped: u32,
}

/// Register the standard styles and emit every node of `body`.
///
/// Highlight colors used in the body but missing from `colors` get a
/// style too, so every span references a defined style. Image failures are isolated: a frame the serializer cannot embed or
/// place is logged and left out. Any other serializer error is returned.
pub fn emit_body<S>(body: &DocumentBody, colors: &ColorTable, serializer: &mut S) -> Result<EmitSummary>
where
    S: DocumentSerializer + ?Sized,
{
    register_styles(colors, serializer)?;
    register_unlisted_highlights(body, colors, serializer)?;

    let mut summary = EmitSummary::default();
    for node in &body.nodes {
        match node {
            DocumentNode::Paragraph(p) => {
                let spans: Vec<Span<'_>> = p.runs.iter().map(Span::from_run).collect();
                serializer.add_paragraph(&spans)?;
                for frame in &p.frames {
                    emit_frame(frame, serializer, &mut summary);
                }
            }
            DocumentNode::Heading(h) => {
                let spans: Vec<Span<'_>> = h.runs.iter().map(Span::from_run).collect();
                serializer.add_heading(h.level, &spans)?;
            }
            DocumentNode::Image(frame) => emit_frame(frame, serializer, &mut summary),
        }
    }
    Ok(summary)
}

fn register_styles<S>(colors: &ColorTable, serializer: &mut S) -> Result<()>
where
    S: DocumentSerializer + ?Sized,
{
    serializer.register_style(&InlineStyle::Bold.name(), &StyleProperties::bold())?;
    serializer.register_style(&InlineStyle::Italic.name(), &StyleProperties::italic())?;
    for (name, display) in colors.iter() {
        let style = InlineStyle::Highlight(name.to_string());
        serializer.register_style(&style.name(), &StyleProperties::highlight(display))?;
    }
    Ok(())
}

fn register_unlisted_highlights<S>(
    body: &DocumentBody,
    colors: &ColorTable,
    serializer: &mut S,
) -> Result<()>
where
    S: DocumentSerializer + ?Sized,
{
    let mut seen: Vec<&str> = Vec::new();
    for run in body.nodes.iter().flat_map(node_runs) {
        let Some(InlineStyle::Highlight(color)) = &run.style else {
            continue;
        };
        if colors.contains(color) || seen.contains(&color.as_str()) {
            continue;
        }
        seen.push(color.as_str());

        // Only hex values are valid backgrounds; named colors stay unshaded.
        let properties = if color.starts_with('#') {
            StyleProperties::highlight(color.as_str())
        } else {
            StyleProperties::default()
        };
        log::debug!("Registering style for unlisted highlight color {}", color);
        serializer.register_style(&run.style_name().unwrap_or_default(), &properties)?;
    }
    Ok(())
}

fn node_runs(node: &DocumentNode) -> &[TextRun] {
    match node {
        DocumentNode::Paragraph(p) => &p.runs,
        DocumentNode::Heading(h) => &h.runs,
        DocumentNode::Image(_) => &[],
    }
}

fn emit_frame<S>(frame: &ImageFrame, serializer: &mut S, summary: &mut EmitSummary)
where
    S: DocumentSerializer + ?Sized,
{
    let placed = serializer
        .embed_image(&frame.path)
        .and_then(|handle| serializer.add_frame(&handle, frame.width_in, frame.height_in));

    match placed {
        Ok(()) => summary.frames_written += 1,
        Err(e) => {
            log::warn!("Leaving out image {}: {}", frame.path.display(), e);
            summary.frames_skipped += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{Heading, Paragraph};
    use std::path::PathBuf;

    #[derive(Default)]
    struct Recorder {
        styles: Vec<String>,
        calls: Vec<String>,
        reject_images: bool,
    }

    impl DocumentSerializer for Recorder {
        fn register_style(&mut self, name: &str, _properties: &StyleProperties) -> Result<()> {
            self.styles.push(name.to_string());
            Ok(())
        }

        fn add_paragraph(&mut self, spans: &[Span<'_>]) -> Result<()> {
            let parts: Vec<String> = spans
                .iter()
                .map(|s| format!("{}:{}", s.style_name.as_deref().unwrap_or("plain"), s.text))
                .collect();
            self.calls.push(format!("p[{}]", parts.join(",")));
            Ok(())
        }

        fn add_heading(&mut self, level: u8, spans: &[Span<'_>]) -> Result<()> {
            let text: String = spans.iter().map(|s| s.text).collect();
            self.calls.push(format!("h{}[{}]", level, text));
            Ok(())
        }

        fn embed_image(&mut self, path: &Path) -> Result<ImageHandle> {
            if self.reject_images {
                return Err(Error::Serializer(format!("cannot read {}", path.display())));
            }
            Ok(ImageHandle::new(0))
        }

        fn add_frame(&mut self, _image: &ImageHandle, width_in: f64, height_in: f64) -> Result<()> {
            self.calls.push(format!("frame[{}x{}]", width_in, height_in));
            Ok(())
        }

        fn save(&mut self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn sample_body() -> DocumentBody {
        let mut body = DocumentBody::new();
        body.push(Heading::with_text(2, "Title").into());
        let mut p = Paragraph::new();
        p.add_run(TextRun::new("a"));
        p.add_run(TextRun::highlight("b", "yellow"));
        body.push(p.into());
        body.push(ImageFrame::new(PathBuf::from("x.png"), 6.0, 4.0).into());
        body
    }

    #[test]
    fn test_emit_registers_styles_and_nodes() {
        let mut recorder = Recorder::default();
        let summary = emit_body(&sample_body(), &ColorTable::default(), &mut recorder).unwrap();

        assert_eq!(recorder.styles[0], "bold");
        assert_eq!(recorder.styles[1], "italic");
        assert!(recorder.styles.contains(&"highlight-yellow".to_string()));
        assert_eq!(recorder.styles.len(), 2 + ColorTable::default().len());

        assert_eq!(
            recorder.calls,
            vec!["h2[Title]", "p[plain:a,highlight-yellow:b]", "frame[6x4]"]
        );
        assert_eq!(summary.frames_written, 1);
        assert_eq!(summary.frames_skipped, 0);
    }

    #[test]
    fn test_image_failure_is_isolated() {
        let mut recorder = Recorder {
            reject_images: true,
            ..Default::default()
        };
        let summary = emit_body(&sample_body(), &ColorTable::default(), &mut recorder).unwrap();

        assert_eq!(recorder.calls.len(), 2);
        assert_eq!(summary.frames_written, 0);
        assert_eq!(summary.frames_skipped, 1);
    }

    #[test]
    fn test_unlisted_highlight_gets_a_style() {
        let mut body = DocumentBody::new();
        let mut p = Paragraph::new();
        p.add_run(TextRun::highlight("a", "red"));
        p.add_run(TextRun::highlight("b", "red"));
        p.add_run(TextRun::highlight("c", "yellow"));
        body.push(p.into());

        let mut recorder = Recorder::default();
        emit_body(&body, &ColorTable::default(), &mut recorder).unwrap();

        let red = recorder
            .styles
            .iter()
            .filter(|s| s.as_str() == "highlight-red")
            .count();
        let yellow = recorder
            .styles
            .iter()
            .filter(|s| s.as_str() == "highlight-yellow")
            .count();
        assert_eq!(red, 1);
        assert_eq!(yellow, 1);
    }

    #[test]
    fn test_paragraph_frames_are_emitted() {
        let mut body = DocumentBody::new();
        let mut p = Paragraph::with_text("caption");
        p.add_frame(ImageFrame::new("y.png", 1.0, 2.0));
        body.push(p.into());

        let mut recorder = Recorder::default();
        emit_body(&body, &ColorTable::empty(), &mut recorder).unwrap();
        assert_eq!(recorder.calls, vec!["p[plain:caption]", "frame[1x2]"]);
    }
}
