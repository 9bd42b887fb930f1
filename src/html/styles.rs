//! Inline style resolution.
//!
//! Inline formatting is tracked as a stack. The top entry is the effective
//! style of the next text run; nothing below it contributes, so nested
//! bold + highlight renders as highlight only.
//!
//! End tags pop by *position*, not by identity. Well-nested markup keeps
//! the stack balanced; overlapping markup such as `<b><i>x</b></i>` will
//! desynchronize it.

use crate::convert::ColorTable;
use crate::model::InlineStyle;

use super::events::{Attributes, Tag};

/// Class token marking a highlight span.
pub const HIGHLIGHT_CLASS: &str = "text-highlight";

/// Prefix of the class token carrying the highlight color.
pub const HIGHLIGHT_COLOR_PREFIX: &str = "hl-";

/// Ordered stack of active inline styles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleStack {
    entries: Vec<InlineStyle>,
}

impl StyleStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a style; it becomes the effective style.
    pub fn push(&mut self, style: InlineStyle) {
        self.entries.push(style);
    }

    /// Pop the top entry, whatever it is. No-op on an empty stack.
    pub fn pop_top(&mut self) -> Option<InlineStyle> {
        self.entries.pop()
    }

    /// Pop the top entry only if it is a highlight.
    pub fn pop_highlight(&mut self) -> Option<InlineStyle> {
        if self.entries.last().is_some_and(InlineStyle::is_highlight) {
            self.entries.pop()
        } else {
            None
        }
    }

    /// The effective style, `None` meaning plain.
    pub fn effective(&self) -> Option<&InlineStyle> {
        self.entries.last()
    }

    /// Number of active entries.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Check if no style is active.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Applies start/end tags to a [`StyleStack`].
#[derive(Debug, Clone)]
pub struct StyleResolver<'a> {
    colors: &'a ColorTable,
    stack: StyleStack,
}

impl<'a> StyleResolver<'a> {
    /// Create a resolver recognizing the given highlight colors.
    pub fn new(colors: &'a ColorTable) -> Self {
        Self {
            colors,
            stack: StyleStack::new(),
        }
    }

    /// Handle a start tag. Returns `true` if a style was pushed.
    pub fn start(&mut self, tag: Tag, attrs: &Attributes) -> bool {
        let style = match tag {
            Tag::Strong | Tag::B => Some(InlineStyle::Bold),
            Tag::Em | Tag::I => Some(InlineStyle::Italic),
            Tag::Span => self.span_highlight(attrs),
            Tag::Mark => attrs
                .data_color
                .as_deref()
                .filter(|c| !c.is_empty())
                .map(|c| InlineStyle::Highlight(c.to_string())),
            _ => None,
        };
        match style {
            Some(style) => {
                self.stack.push(style);
                true
            }
            None => false,
        }
    }

    /// Handle an end tag.
    pub fn end(&mut self, tag: Tag) {
        match tag {
            Tag::Strong | Tag::B | Tag::Em | Tag::I | Tag::Mark => {
                self.stack.pop_top();
            }
            // Incidental spans must not pop a bold/italic opened around them.
            Tag::Span => {
                self.stack.pop_highlight();
            }
            _ => {}
        }
    }

    /// The effective style for a text run.
    pub fn effective(&self) -> Option<&InlineStyle> {
        self.stack.effective()
    }

    /// The underlying stack.
    pub fn stack(&self) -> &StyleStack {
        &self.stack
    }

    fn span_highlight(&self, attrs: &Attributes) -> Option<InlineStyle> {
        if !attrs.has_class(HIGHLIGHT_CLASS) {
            return None;
        }
        attrs
            .class_tokens()
            .filter_map(|t| t.strip_prefix(HIGHLIGHT_COLOR_PREFIX))
            .find(|color| self.colors.contains(color))
            .map(|color| InlineStyle::Highlight(color.to_string()))
    }
}
