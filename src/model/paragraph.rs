//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ImageFrame;

/// A paragraph of text runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in the paragraph
    pub runs: Vec<TextRun>,

    /// Image frames anchored inside the paragraph
    ///
    /// Serializers emit these after the paragraph text. The HTML assembler
    /// never fills them; it appends images to the body as separate nodes.
    pub frames: Vec<ImageFrame>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_run(TextRun::new(text));
        p
    }

    /// Add a text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Anchor an image frame in the paragraph.
    pub fn add_frame(&mut self, frame: ImageFrame) {
        self.frames.push(frame);
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph holds neither runs nor frames.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() && self.frames.is_empty()
    }
}

/// A heading (level 1-6) made of text runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1-6)
    pub level: u8,

    /// Text runs in the heading
    pub runs: Vec<TextRun>,
}

impl Heading {
    /// Create an empty heading. The level is clamped to 1-6.
    pub fn new(level: u8) -> Self {
        Self {
            level: level.clamp(1, 6),
            runs: Vec::new(),
        }
    }

    /// Create a heading with plain text.
    pub fn with_text(level: u8, text: impl Into<String>) -> Self {
        let mut h = Self::new(level);
        h.add_run(TextRun::new(text));
        h
    }

    /// Add a text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Get plain text content of the heading.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A run of text with a single effective style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Effective style, `None` for plain text
    pub style: Option<InlineStyle>,
}

impl TextRun {
    /// Create a plain text run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    /// Create a text run with an optional style.
    pub fn styled(text: impl Into<String>, style: Option<InlineStyle>) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::styled(text, Some(InlineStyle::Bold))
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::styled(text, Some(InlineStyle::Italic))
    }

    /// Create a highlighted text run.
    pub fn highlight(text: impl Into<String>, color: impl Into<String>) -> Self {
        Self::styled(text, Some(InlineStyle::Highlight(color.into())))
    }

    /// Name of the style to apply when serializing, if any.
    pub fn style_name(&self) -> Option<String> {
        self.style.as_ref().map(InlineStyle::name)
    }
}

/// An inline style entry.
///
/// Styles never compose: a run carries exactly one of these, or none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineStyle {
    /// `bold`
    Bold,
    /// `italic`
    Italic,
    /// `highlight-<color>`
    Highlight(String),
}

impl InlineStyle {
    /// Prefix of every highlight style name.
    pub const HIGHLIGHT_PREFIX: &'static str = "highlight-";

    /// The registered style name (`bold`, `italic`, `highlight-<color>`).
    pub fn name(&self) -> String {
        match self {
            InlineStyle::Bold => "bold".to_string(),
            InlineStyle::Italic => "italic".to_string(),
            InlineStyle::Highlight(color) => format!("{}{}", Self::HIGHLIGHT_PREFIX, color),
        }
    }

    /// Check if this is a highlight entry.
    pub fn is_highlight(&self) -> bool {
        matches!(self, InlineStyle::Highlight(_))
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
