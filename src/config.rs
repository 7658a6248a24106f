//! Extraction configuration loaded from `~/.config/pagetext/config.toml`.
//!
//! Every field has a default, so a missing file (or a file that only sets
//! a few keys) is valid. CLI flags are applied on top of the loaded values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Vertical distance (layout units) within which glyphs share a line.
pub const DEFAULT_LINE_TOLERANCE: f64 = 3.0;

/// Mean font size a line must exceed to be classified as a heading.
pub const DEFAULT_HEADING_THRESHOLD: f64 = 12.0;

/// Retries after the first web attempt (4 attempts total).
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Per-attempt navigation timeout.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Elements removed from the page before text collection.
pub const DEFAULT_NOISE_SELECTORS: &[&str] = &[
    "nav",
    "footer",
    "aside",
    ".ads",
    ".hidden",
    "script",
    "style",
    "noscript",
    ".cookie-banner",
    ".newsletter-signup",
    "header",
];

/// Which [`PageRenderer`](crate::render::PageRenderer) backs web extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Plain HTTP fetch + static DOM with inline-style visibility.
    #[default]
    Http,
    /// Headless Chromium (requires the `chrome` feature).
    Chrome,
}

impl std::str::FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "chrome" | "chromium" => Ok(Self::Chrome),
            other => Err(format!("unknown renderer: {other} (expected http or chrome)")),
        }
    }
}

/// Tunables for both extraction paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub line_tolerance: f64,
    pub heading_threshold: f64,
    pub max_retries: u32,
    pub navigation_timeout_secs: u64,
    pub noise_selectors: Vec<String>,
    pub renderer: RendererKind,
    /// `User-Agent` sent by the HTTP renderer.
    pub user_agent: Option<String>,
    /// Directory holding the pdfium shared library. `None` binds to the
    /// system library.
    pub pdfium_library_path: Option<PathBuf>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            line_tolerance: DEFAULT_LINE_TOLERANCE,
            heading_threshold: DEFAULT_HEADING_THRESHOLD,
            max_retries: DEFAULT_MAX_RETRIES,
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT.as_secs(),
            noise_selectors: DEFAULT_NOISE_SELECTORS
                .iter()
                .map(ToString::to_string)
                .collect(),
            renderer: RendererKind::default(),
            user_agent: None,
            pdfium_library_path: None,
        }
    }
}

impl ExtractConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    /// Total number of web attempts (`max_retries + 1`).
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Load configuration from the default location.
    ///
    /// Returns defaults if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        anyhow::ensure!(
            config.line_tolerance > 0.0,
            "line_tolerance must be positive, got {}",
            config.line_tolerance
        );
        Ok(config)
    }
}

/// Return the path to the config file.
fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pagetext")
        .join("config.toml")
}
