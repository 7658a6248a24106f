//! `pagetext` - readable text from web pages and PDFs
//!
//! # Features
//!
//! - **Web Extraction**: visible, deduplicated page text with noise regions
//!   (navigation, footers, ads, cookie banners) removed
//! - **Bounded Retry**: fresh browsing session per attempt, closed on every path
//! - **PDF Structure**: glyph runs regrouped into lines with heading detection
//!   and title inference
//! - **Renderers**: static HTTP fetch by default, headless Chromium with
//!   the `chrome` feature
//!
//! # Example
//!
//! ```rust,no_run
//! use pagetext::{ExtractConfig, Extractor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let extractor = Extractor::new(ExtractConfig::load()?)?;
//!     let page = extractor.extract_url("https://example.com").await?;
//!     println!("{}\n\n{}", page.title, page.text_content);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod extract;
pub mod http_client;
pub mod render;
pub mod retry;

pub use config::{ExtractConfig, RendererKind};
pub use content::{
    Extraction, ExtractionRequest, Glyph, GlyphSource, LineReconstructor, PageGlyphs, PdfPage,
    ReconstructedLine, StructuredPdfDocument, TextCollector, WebExtraction,
};
pub use error::{ExtractError, Result};
pub use extract::{validate_url, Extractor};
pub use http_client::PageClient;
pub use render::{BrowsingSession, PageRenderer};
pub use retry::RetryController;

/// Version of pagetext
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
