//! Text extraction from decoded content.
//!
//! Two pipelines share this module:
//!
//! - **PDF:** a [`GlyphSource`] decodes positioned text runs per page,
//!   [`LineReconstructor`] clusters them into lines and flags headings,
//!   and [`pdf_title`] picks the document title.
//! - **Web:** a [`DomSnapshot`] (from a renderer, or [`html::parse_snapshot`]
//!   for static markup) is walked by [`TextCollector`], which drops noise
//!   subtrees and invisible elements and deduplicates text.
//!
//! # Glyph Sources
//!
//! | Source | Backend | Feature Flag |
//! |--------|---------|-------------|
//! | [`pdfium::PdfiumGlyphSource`] | pdfium shared library | `pdf` |
//!
//! # Example
//!
//! ```rust
//! use pagetext::content::{Glyph, LineReconstructor, PageGlyphs};
//!
//! let page = PageGlyphs {
//!     height: 800.0,
//!     glyphs: vec![
//!         Glyph::from_transform("Report", [18.0, 0.0, 0.0, 18.0, 72.0, 760.0], "Helvetica-Bold"),
//!         Glyph::from_transform("Body", [10.0, 0.0, 0.0, 10.0, 72.0, 700.0], "Helvetica"),
//!     ],
//! };
//! let lines = LineReconstructor::default().reconstruct(&page);
//! assert!(lines[0].is_heading);
//! assert!(!lines[1].is_heading);
//! ```

pub mod dom;
pub mod html;
pub mod pdf;
#[cfg(feature = "pdf")]
pub mod pdfium;
pub mod title;
pub mod types;

pub use dom::{DomElement, DomNode, DomSnapshot, TextCollector};
pub use pdf::{GlyphSource, LineReconstructor};
pub use title::{pdf_title, UNTITLED};
pub use types::{
    Extraction, ExtractionRequest, Glyph, PageGlyphs, PdfPage, ReconstructedLine,
    StructuredPdfDocument, WebExtraction,
};
