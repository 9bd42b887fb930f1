//! Image reference resolution and print geometry.
//!
//! An `<img src>` is mapped to a local file, measured, and turned into an
//! [`ImageFrame`] sized for print. Any failure here skips the image and
//! nothing else.

use crate::convert::ConvertOptions;
use crate::error::Result;
use crate::model::ImageFrame;
use percent_encoding::percent_decode_str;
use std::fmt;
use std::path::{Path, PathBuf};

/// Why an image was left out of the document.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// `http`/`https` images are never embedded
    Remote,
    /// The resolved file does not exist
    Missing(PathBuf),
    /// The file exists but could not be measured
    Unreadable {
        /// Resolved file path
        path: PathBuf,
        /// Underlying error message
        message: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Remote => write!(f, "remote image"),
            SkipReason::Missing(path) => write!(f, "file not found: {}", path.display()),
            SkipReason::Unreadable { path, message } => {
                write!(f, "unreadable image {}: {}", path.display(), message)
            }
        }
    }
}

/// Result of trying to embed one image.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbedOutcome {
    /// The image was measured and framed
    Embedded(ImageFrame),
    /// The image was skipped
    Skipped(SkipReason),
}

/// An image reference as it moves through resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageReference {
    /// Raw `src` attribute
    pub src: String,

    /// Local file the reference resolves to (`None` for remote images)
    pub resolved_path: Option<PathBuf>,

    /// Pixel dimensions (width, height)
    pub pixel_size: Option<(u32, u32)>,

    /// Print dimensions in inches (width, height)
    pub print_size: Option<(f64, f64)>,
}

impl ImageReference {
    fn new(src: &str) -> Self {
        Self {
            src: src.to_string(),
            resolved_path: None,
            pixel_size: None,
            print_size: None,
        }
    }

    /// Convert into a frame once fully resolved.
    pub fn into_frame(self) -> Option<ImageFrame> {
        let path = self.resolved_path?;
        let (width_in, height_in) = self.print_size?;
        Some(ImageFrame::new(path, width_in, height_in))
    }
}

/// Compute print dimensions in inches from pixel dimensions.
///
/// Images wider than `max_width_in` are scaled down uniformly so the aspect
/// ratio is preserved.
pub fn print_size(width_px: u32, height_px: u32, dpi: f64, max_width_in: f64) -> (f64, f64) {
    let mut width_in = f64::from(width_px) / dpi;
    let mut height_in = f64::from(height_px) / dpi;

    if width_in > max_width_in {
        let scale = max_width_in / width_in;
        width_in = max_width_in;
        height_in *= scale;
    }

    (width_in, height_in)
}

/// Resolves `src` attributes against the configured image directory.
#[derive(Debug, Clone)]
pub struct ImageEmbedder<'a> {
    options: &'a ConvertOptions,
}

impl<'a> ImageEmbedder<'a> {
    /// Create an embedder for the given options.
    pub fn new(options: &'a ConvertOptions) -> Self {
        Self { options }
    }

    /// Map a raw `src` to a local path, or `None` for remote images.
    ///
    /// Resolution order: the static route prefix is stripped first, then
    /// `http`/`https` URLs are rejected, and anything else is taken as
    /// relative to the image directory.
    pub fn locate(&self, src: &str) -> Option<PathBuf> {
        let prefix = self.options.route_prefix.as_str();
        let relative = match src.strip_prefix(prefix).filter(|_| !prefix.is_empty()) {
            Some(rest) => rest,
            None if is_remote(src) => return None,
            None => src,
        };

        let relative = relative
            .split(&['?', '#'][..])
            .next()
            .unwrap_or_default()
            .trim_start_matches('/');
        let decoded = percent_decode_str(relative).decode_utf8_lossy();

        Some(self.options.image_dir.join(decoded.as_ref()))
    }

    /// Resolve, measure and size an image reference.
    pub fn resolve(&self, src: &str) -> std::result::Result<ImageReference, SkipReason> {
        let mut reference = ImageReference::new(src);

        let path = self.locate(src).ok_or(SkipReason::Remote)?;
        if !path.is_file() {
            return Err(SkipReason::Missing(path));
        }

        let (width_px, height_px) =
            measure(&path).map_err(|e| SkipReason::Unreadable {
                path: path.clone(),
                message: e.to_string(),
            })?;

        reference.pixel_size = Some((width_px, height_px));
        reference.print_size = Some(print_size(
            width_px,
            height_px,
            self.options.dpi,
            self.options.max_width_in,
        ));
        reference.resolved_path = Some(path);
        Ok(reference)
    }

    /// Embed an image, turning every failure into a skip.
    pub fn embed(&self, src: &str) -> EmbedOutcome {
        let reason = match self.resolve(src).map(ImageReference::into_frame) {
            Ok(Some(frame)) => {
                log::debug!(
                    "Embedding {} at {:.3}in x {:.3}in",
                    frame.path.display(),
                    frame.width_in,
                    frame.height_in
                );
                return EmbedOutcome::Embedded(frame);
            }
            // resolve() fills every field on success
            Ok(None) => SkipReason::Remote,
            Err(reason) => reason,
        };

        match &reason {
            SkipReason::Unreadable { .. } => log::warn!("Skipping image {}: {}", src, reason),
            _ => log::debug!("Skipping image {}: {}", src, reason),
        }
        EmbedOutcome::Skipped(reason)
    }
}

fn is_remote(src: &str) -> bool {
    let lower = src.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Read pixel dimensions from the image header.
fn measure(path: &Path) -> Result<(u32, u32)> {
    Ok(image::image_dimensions(path)?)
}
