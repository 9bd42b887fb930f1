//! Integration tests for the forward conversion path.

use std::path::Path;

use markodt::convert::{ConvertOptions, Converter};
use markodt::html::{tokenize, Event, StyleResolver};
use markodt::{html_to_body, DocumentNode, InlineStyle, TextRun};

fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
    image::RgbImage::new(width, height)
        .save(dir.join(name))
        .unwrap();
}

fn write_bmp(dir: &Path, name: &str, width: u32, height: u32) {
    image::RgbImage::new(width, height)
        .save_with_format(dir.join(name), image::ImageFormat::Bmp)
        .unwrap();
}

fn runs(node: &DocumentNode) -> &[TextRun] {
    match node {
        DocumentNode::Paragraph(p) => &p.runs,
        DocumentNode::Heading(h) => &h.runs,
        DocumentNode::Image(_) => &[],
    }
}

#[test]
fn test_block_count_matches_top_level_blocks() {
    let html = "<h1>One</h1>\n<p>two</p>\n<div>three</div>\n<h3>four</h3>\n<p>five <b>and</b> more</p>";
    let output = html_to_body(html, &ConvertOptions::default());

    assert_eq!(output.body.len(), 5);
    assert_eq!(output.body.block_count(), 5);
    assert_eq!(output.stats.heading_count, 2);
    assert_eq!(output.stats.paragraph_count, 3);
}

#[test]
fn test_balanced_styles_leave_stack_empty() {
    let options = ConvertOptions::default();
    let mut resolver = StyleResolver::new(&options.colors);

    let html = r#"<p><b>a <i>b <mark data-color="blue">c</mark></i></b> <span class="text-highlight hl-green">d</span></p>"#;
    for event in tokenize(html) {
        match event {
            Event::Start(tag, attrs) => {
                resolver.start(tag, &attrs);
            }
            Event::End(tag) => resolver.end(tag),
            Event::Text(_) => {}
        }
    }
    assert!(resolver.stack().is_empty());
}

#[test]
fn test_highlight_inside_bold_is_highlight_only() {
    let output = html_to_body(
        r#"<p><strong><span class="text-highlight hl-yellow">x</span></strong></p>"#,
        &ConvertOptions::default(),
    );

    let runs = runs(&output.body.nodes[0]);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].style_name().as_deref(), Some("highlight-yellow"));
}

#[test]
fn test_unknown_span_color_is_plain() {
    let output = html_to_body(
        r#"<p><span class="text-highlight hl-gray">x</span></p>"#,
        &ConvertOptions::default(),
    );
    assert_eq!(runs(&output.body.nodes[0])[0].style, None);
}

#[test]
fn test_configured_color_is_recognized() {
    let options = ConvertOptions::new().with_color("gray", "#E0E0E0");
    let output = html_to_body(
        r#"<p><span class="text-highlight hl-gray">x</span></p>"#,
        &options,
    );
    assert_eq!(
        runs(&output.body.nodes[0])[0].style,
        Some(InlineStyle::Highlight("gray".into()))
    );
}

#[test]
fn test_span_end_keeps_outer_bold() {
    let output = html_to_body(
        r#"<p><b><span class="other">a</span>b</b></p>"#,
        &ConvertOptions::default(),
    );
    let runs = runs(&output.body.nodes[0]);
    assert_eq!(runs, &[TextRun::bold("a"), TextRun::bold("b")][..]);
}

#[test]
fn test_wide_image_is_scaled_to_max_width() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "wide.png", 1200, 800);
    let options = ConvertOptions::new().with_image_dir(dir.path());

    let output = html_to_body(r#"<p><img src="/static/uploads/wide.png"></p>"#, &options);
    let frames: Vec<_> = output.body.images().collect();

    assert_eq!(frames.len(), 1);
    assert!((frames[0].width_in - 6.0).abs() < 1e-9);
    assert!((frames[0].height_in - 4.0).abs() < 1e-9);
    assert_eq!(frames[0].path, dir.path().join("wide.png"));
}

#[test]
fn test_narrow_image_keeps_natural_size() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "small.png", 480, 320);
    let options = ConvertOptions::new().with_image_dir(dir.path());

    let output = html_to_body(r#"<img src="small.png">"#, &options);
    let frame = output.body.images().next().unwrap();

    assert!((frame.width_in - 5.0).abs() < 1e-9);
    assert!((frame.height_in - 3.333).abs() < 1e-3);
}

#[test]
fn test_remote_image_is_skipped() {
    let converter = Converter::default();
    let output = converter.to_body(r#"<p>see <img src="http://example.com/x.png"></p>"#);

    assert_eq!(output.body.images().count(), 0);
    assert_eq!(output.stats.image_count, 0);
    assert_eq!(output.stats.skipped_image_count, 1);
}

#[test]
fn test_remote_image_conversion_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let converter = Converter::new(ConvertOptions::new().with_temp_dir(dir.path())).unwrap();

    let artifact = converter
        .convert(r#"<p>see <img src="https://example.com/x.png"></p><p>after</p>"#)
        .unwrap();

    assert_eq!(artifact.stats().image_count, 0);
    assert_eq!(artifact.stats().skipped_image_count, 1);
    let xml = artifact.read_to_string().unwrap();
    assert!(!xml.contains("draw:frame"));
    assert!(xml.contains(">after<"));

    let dest = artifact.persist(dir.path().join("remote.fodt")).unwrap();
    assert!(dest.exists());
}

#[test]
fn test_bmp_image_is_embedded() {
    let dir = tempfile::tempdir().unwrap();
    write_bmp(dir.path(), "pic.bmp", 480, 320);
    let options = ConvertOptions::new().with_image_dir(dir.path());

    let output = html_to_body(r#"<img src="/static/uploads/pic.bmp">"#, &options);
    let frames: Vec<_> = output.body.images().collect();

    assert_eq!(frames.len(), 1);
    assert_eq!(output.stats.skipped_image_count, 0);
    assert!((frames[0].width_in - 5.0).abs() < 1e-9);
    assert!((frames[0].height_in - 3.333).abs() < 1e-3);
}

#[test]
fn test_unlisted_mark_color_has_defined_style() {
    let dir = tempfile::tempdir().unwrap();
    let converter = Converter::new(ConvertOptions::new().with_temp_dir(dir.path())).unwrap();

    let artifact = converter
        .convert(r#"<p><mark data-color="red">x</mark></p>"#)
        .unwrap();
    let xml = artifact.read_to_string().unwrap();

    assert!(xml.contains(r#"text:style-name="highlight-red""#));
    assert!(xml.contains(r#"style:name="highlight-red""#));
}

#[test]
fn test_missing_and_corrupt_images_do_not_abort() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.png"), b"not an image").unwrap();
    let options = ConvertOptions::new()
        .with_image_dir(dir.path())
        .with_temp_dir(dir.path());

    let html = r#"<p>a</p><img src="/static/uploads/missing.png"><img src="/static/uploads/broken.png"><p>b</p>"#;
    let artifact = Converter::new(options).unwrap().convert(html).unwrap();

    assert_eq!(artifact.stats().image_count, 0);
    assert_eq!(artifact.stats().skipped_image_count, 2);
    let xml = artifact.read_to_string().unwrap();
    assert!(xml.contains(">a<"));
    assert!(xml.contains(">b<"));
}

#[test]
fn test_embedded_image_is_inlined() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "pic.png", 96, 48);
    let options = ConvertOptions::new()
        .with_image_dir(dir.path())
        .with_temp_dir(dir.path());

    let artifact = Converter::new(options)
        .unwrap()
        .convert(r#"<p><img src="/static/uploads/pic.png"></p>"#)
        .unwrap();

    let xml = artifact.read_to_string().unwrap();
    assert_eq!(artifact.stats().image_count, 1);
    assert!(xml.contains(r#"svg:width="1.000in""#));
    assert!(xml.contains(r#"svg:height="0.500in""#));
    assert!(xml.contains("<office:binary-data>"));
}

#[test]
fn test_malformed_markup_never_fails() {
    let output = html_to_body(
        "<p>unclosed <b>bold <i>and</p> stray < text </div></span>",
        &ConvertOptions::default(),
    );
    assert!(!output.body.is_empty());
}
