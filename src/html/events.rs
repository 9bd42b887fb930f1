//! HTML event walker.
//!
//! Splits an HTML string into start/end/text events for the fixed set of
//! tags the assembler understands. Anything else is transparent: the tag
//! itself vanishes but its text still comes through. The walker never
//! fails; malformed markup at worst mis-segments text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Markup constructs: comments, declarations, processing instructions and tags.
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<!--.*?-->|<![^>]*>|<\?[^>]*>|<(/?)([A-Za-z][A-Za-z0-9]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#,
    )
    .unwrap()
});

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .unwrap()
});

/// A recognized tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `p`
    P,
    /// `div`
    Div,
    /// `h1` .. `h6`
    Heading(u8),
    /// `strong`
    Strong,
    /// `b`
    B,
    /// `em`
    Em,
    /// `i`
    I,
    /// `span`
    Span,
    /// `mark`
    Mark,
    /// `br`
    Br,
    /// `img`
    Img,
}

impl Tag {
    /// Look up a tag by (case-insensitive) name.
    pub fn from_name(name: &str) -> Option<Tag> {
        let tag = match name.to_ascii_lowercase().as_str() {
            "p" => Tag::P,
            "div" => Tag::Div,
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "strong" => Tag::Strong,
            "b" => Tag::B,
            "em" => Tag::Em,
            "i" => Tag::I,
            "span" => Tag::Span,
            "mark" => Tag::Mark,
            "br" => Tag::Br,
            "img" => Tag::Img,
            _ => return None,
        };
        Some(tag)
    }

    /// Void tags never have an end tag.
    pub fn is_void(self) -> bool {
        matches!(self, Tag::Br | Tag::Img)
    }

    /// Block-level tags (`p`, `div`, `h1`-`h6`).
    pub fn is_block(self) -> bool {
        matches!(self, Tag::P | Tag::Div | Tag::Heading(_))
    }
}

/// The attributes the converter cares about. Everything else is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    /// `class`
    pub class: Option<String>,
    /// `data-color`
    pub data_color: Option<String>,
    /// `src`
    pub src: Option<String>,
}

impl Attributes {
    /// Whitespace-separated tokens of the `class` attribute.
    pub fn class_tokens(&self) -> impl Iterator<Item = &str> {
        self.class.as_deref().unwrap_or("").split_whitespace()
    }

    /// Check if `class` contains the given token.
    pub fn has_class(&self, token: &str) -> bool {
        self.class_tokens().any(|t| t == token)
    }

    fn parse(raw: &str) -> Self {
        let mut attrs = Attributes::default();
        for caps in ATTR_RE.captures_iter(raw) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()).into_owned())
                .unwrap_or_default();
            match caps[1].to_ascii_lowercase().as_str() {
                "class" => attrs.class = Some(value),
                "data-color" => attrs.data_color = Some(value),
                "src" => attrs.src = Some(value),
                _ => {}
            }
        }
        attrs
    }
}

/// A markup event, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A recognized start tag
    Start(Tag, Attributes),
    /// A recognized end tag
    End(Tag),
    /// Character data with references decoded
    Text(String),
}

/// Tokenize an HTML string into events.
pub fn tokenize(html: &str) -> Vec<Event> {
    let mut events = Vec::new();
    let mut last = 0;

    for caps in TAG_RE.captures_iter(html) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        push_text(&mut events, &html[last..whole.start]);
        last = whole.end;

        // Comments and declarations have no name group.
        let Some(name) = caps.get(2) else {
            continue;
        };
        let Some(tag) = Tag::from_name(name.as_str()) else {
            continue;
        };

        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        if closing {
            if !tag.is_void() {
                events.push(Event::End(tag));
            }
            continue;
        }

        let raw_attrs = caps.get(3).map_or("", |m| m.as_str());
        events.push(Event::Start(tag, Attributes::parse(raw_attrs)));
        if raw_attrs.trim_end().ends_with('/') && !tag.is_void() {
            events.push(Event::End(tag));
        }
    }

    push_text(&mut events, &html[last..]);
    events
}

fn push_text(events: &mut Vec<Event>, raw: &str) {
    if raw.is_empty() {
        return;
    }
    events.push(Event::Text(decode_entities(raw).into_owned()));
}

/// Decode character and entity references, leaving the text raw if any
/// reference is unknown or malformed.
fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    quick_xml::escape::unescape_with(raw, resolve_entity).unwrap_or(Cow::Borrowed(raw))
}

fn resolve_entity(name: &str) -> Option<&'static str> {
    let resolved = match name {
        "nbsp" => "\u{a0}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        _ => return quick_xml::escape::resolve_predefined_entity(name),
    };
    Some(resolved)
}
