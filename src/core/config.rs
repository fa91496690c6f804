//! Branding, layout and path configuration shared by every template.
//!
//! A [`Config`] is built once at startup and handed to templates by reference.
//! Values start from built-in defaults; a TOML file may override any subset:
//!
//! ```toml
//! [branding]
//! brand_blue = "#2563eb"
//! font = "Helvetica-Bold"
//!
//! [layout]
//! page_size = "a4"
//! margin = 54.0
//!
//! [paths]
//! output_dir = "build/forms"
//! ```
//!
//! # Config file discovery
//!
//! 1. Path passed with `--config`
//! 2. Path in the `FORMSMITH_CONFIG` environment variable
//! 3. `formsmith.toml` in the current working directory
//! 4. `~/.config/formsmith/config.toml` in the user's config directory
//!
//! The first two must exist; the last two are used only when present.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, info};

use crate::core::error::{Error, Result};
use crate::pdf::{Color, StandardFont};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "FORMSMITH_CONFIG";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "formsmith.toml";

/// Narrowest content width the built-in forms fit in (their widest row)
pub const MIN_CONTENT_WIDTH: f32 = 448.0;

/// Shortest content height that holds any section the forms keep together
pub const MIN_CONTENT_HEIGHT: f32 = 240.0;

/// Trait for reading the config location, allowing dependency injection for testing
pub trait ConfigPathReader {
    fn config_path_var(&self) -> Option<String>;
}

/// Production implementation that reads from environment variables
pub struct EnvConfigPathReader;

impl ConfigPathReader for EnvConfigPathReader {
    fn config_path_var(&self) -> Option<String> {
        std::env::var(CONFIG_ENV_VAR).ok()
    }
}

/// Mock implementation for testing with controlled values
#[cfg(test)]
pub struct MockConfigPathReader(Option<String>);

#[cfg(test)]
impl MockConfigPathReader {
    pub fn new(path: Option<String>) -> Self {
        Self(path)
    }
}

#[cfg(test)]
impl ConfigPathReader for MockConfigPathReader {
    fn config_path_var(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Complete configuration handed to every template
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub branding: Branding,
    pub layout: Layout,
    pub paths: Paths,
}

/// Brand colors and type sizes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Branding {
    /// Primary brand color for title bars and headings
    pub brand_blue: Color,
    /// Dark text and outlines
    pub brand_dark: Color,
    /// Secondary accent for rules and light borders
    pub accent: Color,
    /// Font family used for all text
    pub font: StandardFont,
    pub font_size_body: f32,
    pub font_size_heading: f32,
    pub font_size_label: f32,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            brand_blue: Color::rgb(0x60, 0xa5, 0xfa),
            brand_dark: Color::rgb(0x1e, 0x29, 0x3b),
            accent: Color::rgb(0x64, 0x74, 0x8b),
            font: StandardFont::Helvetica,
            font_size_body: 10.0,
            font_size_heading: 12.0,
            font_size_label: 9.0,
        }
    }
}

/// Page geometry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    /// Uniform page margin in points
    pub margin: f32,
    pub page_size: PageSize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            margin: 72.0,
            page_size: PageSize::LETTER,
        }
    }
}

impl Layout {
    /// Width available between the left and right margins
    pub fn content_width(&self) -> f32 {
        self.page_size.width - 2.0 * self.margin
    }

    /// Y coordinate of the top margin
    pub fn top(&self) -> f32 {
        self.page_size.height - self.margin
    }

    /// Height available between the top and bottom margins
    pub fn content_height(&self) -> f32 {
        self.page_size.height - 2.0 * self.margin
    }
}

/// Filesystem locations
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Paths {
    /// Default directory for generated PDFs
    pub output_dir: PathBuf,
    /// Root of the optional asset tree; logos live in `logos/`
    pub assets_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl Paths {
    pub fn logos_dir(&self) -> PathBuf {
        self.assets_dir.join("logos")
    }
}

/// Page size in points
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// US Letter, 8.5" x 11"
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };
    /// US Legal, 8.5" x 14"
    pub const LEGAL: PageSize = PageSize {
        width: 612.0,
        height: 1008.0,
    };
    /// ISO A4
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "letter" => Ok(Self::LETTER),
            "legal" => Ok(Self::LEGAL),
            "a4" => Ok(Self::A4),
            other => {
                let (w, h) = other
                    .split_once('x')
                    .ok_or_else(|| format!("Unknown page size: {s}"))?;
                let width: f32 = w.trim().parse().map_err(|_| format!("Bad page width: {w}"))?;
                let height: f32 = h.trim().parse().map_err(|_| format!("Bad page height: {h}"))?;
                if width <= 0.0 || height <= 0.0 {
                    return Err(format!("Page size must be positive: {s}"));
                }
                Ok(Self { width, height })
            }
        }
    }
}

impl TryFrom<String> for PageSize {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl Config {
    /// Parse a TOML document, filling anything it omits with defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Cannot read config {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Load the effective configuration following the discovery order
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with_reader(explicit, &EnvConfigPathReader)
    }

    /// Same as [`Config::load`] with an injectable environment reader
    pub fn load_with_reader<R: ConfigPathReader>(
        explicit: Option<&Path>,
        reader: &R,
    ) -> Result<Self> {
        match Self::resolve_path(explicit, reader)? {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration");
                Self::from_file(&path)
            }
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn resolve_path<R: ConfigPathReader>(
        explicit: Option<&Path>,
        reader: &R,
    ) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            return Self::require_existing(path.to_path_buf());
        }
        if let Some(var) = reader.config_path_var().filter(|v| !v.is_empty()) {
            return Self::require_existing(PathBuf::from(var));
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Ok(Some(local));
        }
        if let Some(user) = dirs::config_dir().map(|d| d.join("formsmith").join("config.toml")) {
            if user.is_file() {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    fn require_existing(path: PathBuf) -> Result<Option<PathBuf>> {
        if path.is_file() {
            Ok(Some(path))
        } else {
            Err(Error::config(format!(
                "Config file not found: {}",
                path.display()
            )))
        }
    }

    fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        if layout.margin < 0.0 {
            return Err(Error::config(format!(
                "Margin must not be negative, got {}",
                layout.margin
            )));
        }
        if layout.content_width() < MIN_CONTENT_WIDTH
            || layout.content_height() < MIN_CONTENT_HEIGHT
        {
            return Err(Error::config(format!(
                "Margin {} on a {} page leaves {}x{} for content, forms need at least {}x{}",
                layout.margin,
                layout.page_size,
                layout.content_width(),
                layout.content_height(),
                MIN_CONTENT_WIDTH,
                MIN_CONTENT_HEIGHT
            )));
        }
        let b = &self.branding;
        for (name, size) in [
            ("font_size_body", b.font_size_body),
            ("font_size_heading", b.font_size_heading),
            ("font_size_label", b.font_size_label),
        ] {
            if size <= 0.0 {
                return Err(Error::config(format!("{name} must be positive")));
            }
        }
        Ok(())
    }
}
