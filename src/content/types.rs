//! Shared types for content extraction.
//!
//! Glyph and line types used by PDF line reconstruction, and the result
//! shapes returned to callers. Field names serialize in camelCase to match
//! the JSON bodies consumers already expect.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

/// A positioned text run decoded from a PDF page.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    /// Horizontal origin in PDF points.
    pub x: f64,
    /// Baseline Y position (bottom-up coordinate system).
    pub y: f64,
    pub font_size: f64,
    pub font_family: String,
}

impl Glyph {
    /// Build a glyph from a text-space transform `[a, b, c, d, e, f]`.
    ///
    /// The translation gives the position; the font size is the length of
    /// the horizontal scale vector `(a, b)`, so rotated text keeps its size.
    pub fn from_transform(
        text: impl Into<String>,
        transform: [f64; 6],
        font_family: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            x: transform[4],
            y: transform[5],
            font_size: transform[0].hypot(transform[1]),
            font_family: font_family.into(),
        }
    }
}

/// Glyphs of one page plus the page height needed to flip coordinates.
#[derive(Debug, Clone, Default)]
pub struct PageGlyphs {
    pub height: f64,
    pub glyphs: Vec<Glyph>,
}

/// A text line rebuilt from vertically clustered glyphs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructedLine {
    pub text: String,
    pub is_heading: bool,
    /// Mean font size of the line's glyphs.
    pub font_size: f64,
    pub font_family: String,
    /// Cluster key: flipped, quantized vertical position (top of page = 0).
    #[serde(skip)]
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfPage {
    /// 1-based.
    pub page_number: u32,
    pub content: Vec<ReconstructedLine>,
}

/// Structured result of a PDF extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredPdfDocument {
    pub title: String,
    pub total_pages: u32,
    pub pages: Vec<PdfPage>,
}

impl StructuredPdfDocument {
    /// Render the document as readable plain text.
    ///
    /// Headings are wrapped in `## … ##` and pages are separated by
    /// `=== Page N ===` banners.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Document Title: {}", self.title);
        let _ = writeln!(out, "Total Pages: {}", self.total_pages);

        for page in &self.pages {
            let _ = writeln!(out, "\n=== Page {} ===\n", page.page_number);
            for line in &page.content {
                if line.is_heading {
                    let _ = writeln!(out, "\n## {} ##", line.text);
                } else {
                    let _ = writeln!(out, "{}", line.text);
                }
            }
        }

        out
    }
}

/// Structured result of a web page extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebExtraction {
    pub title: String,
    /// Newline-joined, deduplicated visible text.
    pub text_content: String,
}

/// What to extract from. Scoped to one extraction call.
#[derive(Debug, Clone)]
pub enum ExtractionRequest {
    Url(String),
    File(PathBuf),
    /// In-memory PDF bytes with the original file name (title fallback only).
    Bytes { bytes: Vec<u8>, file_name: String },
}

/// Result of [`Extractor::extract`](crate::extract::Extractor::extract).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Extraction {
    Web(WebExtraction),
    Pdf(StructuredPdfDocument),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_font_size_is_scale_magnitude() {
        let glyph = Glyph::from_transform("Hi", [3.0, 4.0, -4.0, 3.0, 72.0, 700.0], "F1");
        assert!((glyph.font_size - 5.0).abs() < 1e-9);
        assert!((glyph.x - 72.0).abs() < f64::EPSILON);
        assert!((glyph.y - 700.0).abs() < f64::EPSILON);
    }

    #[test]
    fn line_serializes_camel_case_without_cluster_key() {
        let line = ReconstructedLine {
            text: "Intro".into(),
            is_heading: true,
            font_size: 18.0,
            font_family: "g_d0_f1".into(),
            y: 99.0,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["isHeading"], true);
        assert_eq!(json["fontFamily"], "g_d0_f1");
        assert!(json.get("y").is_none());
    }

    #[test]
    fn document_text_marks_headings_and_pages() {
        let doc = StructuredPdfDocument {
            title: "Report".into(),
            total_pages: 1,
            pages: vec![PdfPage {
                page_number: 1,
                content: vec![
                    ReconstructedLine {
                        text: "Report".into(),
                        is_heading: true,
                        font_size: 18.0,
                        font_family: "F1".into(),
                        y: 0.0,
                    },
                    ReconstructedLine {
                        text: "Body".into(),
                        is_heading: false,
                        font_size: 10.0,
                        font_family: "F2".into(),
                        y: 3.0,
                    },
                ],
            }],
        };
        let text = doc.to_text();
        assert!(text.starts_with("Document Title: Report\nTotal Pages: 1\n"));
        assert!(text.contains("=== Page 1 ==="));
        assert!(text.contains("## Report ##"));
        assert!(text.contains("\nBody\n"));
    }

    #[test]
    fn web_extraction_serializes_text_content() {
        let web = WebExtraction {
            title: "Example".into(),
            text_content: "Hello".into(),
        };
        let json = serde_json::to_string(&web).unwrap();
        assert_eq!(json, r#"{"title":"Example","textContent":"Hello"}"#);
    }
}
