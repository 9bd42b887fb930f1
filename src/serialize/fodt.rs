//! Flat ODF text document (`.fodt`) writer.
//!
//! Produces a single XML file; image binaries are inlined as base64
//! `office:binary-data`, so no zip package is involved.

use super::{DocumentSerializer, ImageHandle, Span, StyleProperties};
use crate::error::{Error, Result};
use base64::Engine;
use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::path::Path;

const NAMESPACES: &str = concat!(
    r#"xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" "#,
    r#"xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" "#,
    r#"xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" "#,
    r#"xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" "#,
    r#"xmlns:draw="urn:oasis:names:tc:opendocument:xmlns:drawing:1.0" "#,
    r#"xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" "#,
    r#"xmlns:xlink="http://www.w3.org/1999/xlink" "#,
    r#"xmlns:svg="urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0""#,
);

const COMMON_STYLES: &str = concat!(
    "<office:styles>",
    r#"<style:style style:name="Standard" style:family="paragraph"/>"#,
    r#"<style:style style:name="Heading_20_1" style:display-name="Heading 1" style:family="paragraph"><style:text-properties fo:font-size="24pt" fo:font-weight="bold"/></style:style>"#,
    r#"<style:style style:name="Heading_20_2" style:display-name="Heading 2" style:family="paragraph"><style:text-properties fo:font-size="18pt" fo:font-weight="bold"/></style:style>"#,
    r#"<style:style style:name="Heading_20_3" style:display-name="Heading 3" style:family="paragraph"><style:text-properties fo:font-size="14pt" fo:font-weight="bold"/></style:style>"#,
    r#"<style:style style:name="Heading_20_4" style:display-name="Heading 4" style:family="paragraph"><style:text-properties fo:font-size="12pt" fo:font-weight="bold"/></style:style>"#,
    r#"<style:style style:name="Heading_20_5" style:display-name="Heading 5" style:family="paragraph"><style:text-properties fo:font-size="11pt" fo:font-weight="bold"/></style:style>"#,
    r#"<style:style style:name="Heading_20_6" style:display-name="Heading 6" style:family="paragraph"><style:text-properties fo:font-size="10pt" fo:font-weight="bold"/></style:style>"#,
    "</office:styles>",
);

/// In-memory flat ODF text document.
#[derive(Debug, Clone, Default)]
pub struct FlatOdtWriter {
    /// Registered automatic text styles, in registration order
    styles: Vec<(String, StyleProperties)>,

    /// Serialized `office:text` children
    body: String,

    /// Base64 payloads of embedded images
    images: Vec<String>,

    frame_count: usize,
}

impl FlatOdtWriter {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered styles.
    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    /// Number of embedded images.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Render the complete document XML.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(self.body.len() + 2048);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        let _ = write!(
            xml,
            r#"<office:document {} office:version="1.3" office:mimetype="application/vnd.oasis.opendocument.text">"#,
            NAMESPACES
        );
        xml.push_str(COMMON_STYLES);

        xml.push_str("<office:automatic-styles>");
        for (name, props) in &self.styles {
            write_style(&mut xml, name, props);
        }
        xml.push_str("</office:automatic-styles>");

        xml.push_str("<office:body><office:text>");
        xml.push_str(&self.body);
        xml.push_str("</office:text></office:body></office:document>\n");
        xml
    }

    fn write_spans(&mut self, spans: &[Span<'_>]) {
        for span in spans {
            match &span.style_name {
                Some(name) => {
                    let _ = write!(self.body, r#"<text:span text:style-name="{}">"#, escape(name));
                    write_text(&mut self.body, span.text);
                    self.body.push_str("</text:span>");
                }
                None => write_text(&mut self.body, span.text),
            }
        }
    }
}

impl DocumentSerializer for FlatOdtWriter {
    fn register_style(&mut self, name: &str, properties: &StyleProperties) -> Result<()> {
        match self.styles.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = properties.clone(),
            None => self.styles.push((name.to_string(), properties.clone())),
        }
        Ok(())
    }

    fn add_paragraph(&mut self, spans: &[Span<'_>]) -> Result<()> {
        self.body.push_str(r#"<text:p text:style-name="Standard">"#);
        self.write_spans(spans);
        self.body.push_str("</text:p>");
        Ok(())
    }

    fn add_heading(&mut self, level: u8, spans: &[Span<'_>]) -> Result<()> {
        let level = level.clamp(1, 6);
        let _ = write!(
            self.body,
            r#"<text:h text:style-name="Heading_20_{0}" text:outline-level="{0}">"#,
            level
        );
        self.write_spans(spans);
        self.body.push_str("</text:h>");
        Ok(())
    }

    fn embed_image(&mut self, path: &Path) -> Result<ImageHandle> {
        let data = std::fs::read(path)?;
        self.images
            .push(base64::engine::general_purpose::STANDARD.encode(data));
        Ok(ImageHandle::new(self.images.len() - 1))
    }

    fn add_frame(&mut self, image: &ImageHandle, width_in: f64, height_in: f64) -> Result<()> {
        let data = self.images.get(image.index()).ok_or_else(|| {
            Error::Serializer(format!("unknown image handle {}", image.index()))
        })?;
        self.frame_count += 1;
        let _ = write!(
            self.body,
            concat!(
                r#"<text:p text:style-name="Standard">"#,
                r#"<draw:frame draw:name="Image{}" text:anchor-type="as-char" svg:width="{:.3}in" svg:height="{:.3}in">"#,
                r#"<draw:image><office:binary-data>{}</office:binary-data></draw:image>"#,
                "</draw:frame></text:p>"
            ),
            self.frame_count, width_in, height_in, data
        );
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_xml())?;
        log::info!("Saved document to {}", path.display());
        Ok(())
    }
}

fn write_style(xml: &mut String, name: &str, props: &StyleProperties) {
    let _ = write!(
        xml,
        r#"<style:style style:name="{}" style:family="text"><style:text-properties"#,
        escape(name)
    );
    if props.bold {
        xml.push_str(r#" fo:font-weight="bold""#);
    }
    if props.italic {
        xml.push_str(r#" fo:font-style="italic""#);
    }
    if let Some(color) = &props.background_color {
        let _ = write!(xml, r#" fo:background-color="{}""#, escape(color.as_str()));
    }
    xml.push_str("/></style:style>");
}

/// Write character data, keeping runs of spaces, tabs and newlines, which
/// ODF would otherwise collapse.
fn write_text(out: &mut String, text: &str) {
    let mut chunk_start = 0;
    let mut spaces = 0usize;

    for (i, ch) in text.char_indices() {
        if ch == ' ' {
            if spaces == 0 {
                out.push_str(&escape(&text[chunk_start..i]));
            }
            spaces += 1;
            chunk_start = i + 1;
            continue;
        }
        flush_spaces(out, &mut spaces);
        match ch {
            '\n' | '\t' => {
                out.push_str(&escape(&text[chunk_start..i]));
                out.push_str(if ch == '\n' {
                    "<text:line-break/>"
                } else {
                    "<text:tab/>"
                });
                chunk_start = i + 1;
            }
            _ => {}
        }
    }
    flush_spaces(out, &mut spaces);
    out.push_str(&escape(&text[chunk_start..]));
}

fn flush_spaces(out: &mut String, spaces: &mut usize) {
    match *spaces {
        0 => {}
        1 => out.push(' '),
        n => {
            let _ = write!(out, r#" <text:s text:c="{}"/>"#, n - 1);
        }
    }
    *spaces = 0;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(s: &str) -> String {
        let mut out = String::new();
        write_text(&mut out, s);
        out
    }

    #[test]
    fn test_write_text_escapes() {
        assert_eq!(text_of("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn test_write_text_keeps_whitespace() {
        assert_eq!(text_of("a   b"), r#"a <text:s text:c="2"/>b"#);
        assert_eq!(text_of("a\nb\tc"), "a<text:line-break/>b<text:tab/>c");
        assert_eq!(text_of("end  "), r#"end <text:s text:c="1"/>"#);
    }

    #[test]
    fn test_document_structure() {
        let mut writer = FlatOdtWriter::new();
        writer
            .register_style("bold", &StyleProperties::bold())
            .unwrap();
        writer
            .register_style("highlight-yellow", &StyleProperties::highlight("#FFF176"))
            .unwrap();
        writer
            .add_heading(
                2,
                &[Span {
                    text: "Title",
                    style_name: None,
                }],
            )
            .unwrap();
        writer
            .add_paragraph(&[
                Span {
                    text: "plain ",
                    style_name: None,
                },
                Span {
                    text: "marked",
                    style_name: Some("highlight-yellow".into()),
                },
            ])
            .unwrap();

        let xml = writer.to_xml();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"<style:style style:name="bold" style:family="text"><style:text-properties fo:font-weight="bold"/></style:style>"#));
        assert!(xml.contains(r##"fo:background-color="#FFF176""##));
        assert!(xml.contains(r#"<text:h text:style-name="Heading_20_2" text:outline-level="2">Title</text:h>"#));
        assert!(xml.contains(r#"<text:span text:style-name="highlight-yellow">marked</text:span>"#));
    }

    #[test]
    fn test_register_style_replaces() {
        let mut writer = FlatOdtWriter::new();
        writer.register_style("bold", &StyleProperties::bold()).unwrap();
        writer.register_style("bold", &StyleProperties::italic()).unwrap();
        assert_eq!(writer.style_count(), 1);
    }

    #[test]
    fn test_frame_embeds_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.bin");
        std::fs::write(&path, b"abc").unwrap();

        let mut writer = FlatOdtWriter::new();
        let handle = writer.embed_image(&path).unwrap();
        writer.add_frame(&handle, 6.0, 4.0).unwrap();

        let xml = writer.to_xml();
        assert_eq!(writer.image_count(), 1);
        assert!(xml.contains(r#"svg:width="6.000in" svg:height="4.000in""#));
        assert!(xml.contains("<office:binary-data>YWJj</office:binary-data>"));
    }

    #[test]
    fn test_unknown_handle_rejected() {
        let mut writer = FlatOdtWriter::new();
        let result = writer.add_frame(&ImageHandle::new(3), 1.0, 1.0);
        assert!(matches!(result, Err(Error::Serializer(_))));
    }

    #[test]
    fn test_missing_image_file_is_io_error() {
        let mut writer = FlatOdtWriter::new();
        let result = writer.embed_image(Path::new("/definitely/not/here.png"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fodt");
        let mut writer = FlatOdtWriter::new();
        writer.add_paragraph(&[]).unwrap();
        writer.save(&path).unwrap();

        let xml = std::fs::read_to_string(&path).unwrap();
        assert!(xml.contains(r#"<text:p text:style-name="Standard"></text:p>"#));
    }
}
