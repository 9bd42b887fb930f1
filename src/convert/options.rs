//! Conversion options and configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default print width limit in inches.
pub const DEFAULT_MAX_WIDTH_IN: f64 = 6.0;

/// Default pixel density used to convert pixels to inches.
pub const DEFAULT_DPI: f64 = 96.0;

/// Default route under which the static server exposes uploaded images.
pub const DEFAULT_ROUTE_PREFIX: &str = "/static/uploads/";

/// Default local directory holding uploaded images.
pub const DEFAULT_IMAGE_DIR: &str = "static/uploads";

/// Options for converting HTML into a document.
///
/// Every field has a default, so a JSON config file only needs the keys
/// it wants to change:
///
/// ```
/// use markodt::ConvertOptions;
///
/// let options: ConvertOptions =
///     serde_json::from_str(r#"{ "image_dir": "uploads", "dpi": 72 }"#).unwrap();
/// assert_eq!(options.dpi, 72.0);
/// assert_eq!(options.max_width_in, 6.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Directory that image references resolve against
    pub image_dir: PathBuf,

    /// Route prefix of the static image server (e.g., "/static/uploads/")
    pub route_prefix: String,

    /// Recognized highlight colors
    pub colors: ColorTable,

    /// Maximum print width of an image in inches
    pub max_width_in: f64,

    /// Pixel density for pixel-to-inch conversion
    pub dpi: f64,

    /// Directory for temporary output artifacts (system default if unset)
    pub temp_dir: Option<PathBuf>,
}

impl ConvertOptions {
    /// Create new conversion options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Set the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = dir.into();
        self
    }

    /// Set the static image route prefix.
    pub fn with_route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_prefix = prefix.into();
        self
    }

    /// Replace the color table.
    pub fn with_colors(mut self, colors: ColorTable) -> Self {
        self.colors = colors;
        self
    }

    /// Add or replace a single highlight color.
    pub fn with_color(mut self, name: impl Into<String>, display: impl Into<String>) -> Self {
        self.colors.insert(name, display);
        self
    }

    /// Set the maximum image print width in inches.
    pub fn with_max_width(mut self, inches: f64) -> Self {
        self.max_width_in = inches;
        self
    }

    /// Set the pixel density.
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the directory for temporary output artifacts.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Check that the numeric settings are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(Error::Config(format!("dpi must be positive, got {}", self.dpi)));
        }
        if !(self.max_width_in.is_finite() && self.max_width_in > 0.0) {
            return Err(Error::Config(format!(
                "max_width_in must be positive, got {}",
                self.max_width_in
            )));
        }
        Ok(())
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            colors: ColorTable::default(),
            max_width_in: DEFAULT_MAX_WIDTH_IN,
            dpi: DEFAULT_DPI,
            temp_dir: None,
        }
    }
}

/// Mapping of highlight color names to display colors (`#rrggbb`).
///
/// Deployments disagree on the last slot (`pink` or `gray`), so the table is
/// plain configuration rather than a fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTable(BTreeMap<String, String>);

impl ColorTable {
    /// Create an empty table.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace a color.
    pub fn insert(&mut self, name: impl Into<String>, display: impl Into<String>) {
        self.0.insert(name.into(), display.into());
    }

    /// Remove a color.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Add a color, builder style.
    pub fn with(mut self, name: impl Into<String>, display: impl Into<String>) -> Self {
        self.insert(name, display);
        self
    }

    /// Remove a color, builder style.
    pub fn without(mut self, name: &str) -> Self {
        self.remove(name);
        self
    }

    /// Check if a color name is recognized.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Display color for a name.
    pub fn display(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterate over `(name, display)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::empty()
            .with("yellow", "#FFF176")
            .with("green", "#A5D6A7")
            .with("blue", "#90CAF9")
            .with("orange", "#FFCC80")
            .with("purple", "#CE93D8")
            .with("pink", "#F48FB1")
    }
}
