//! PDF line reconstruction.
//!
//! A [`GlyphSource`] decodes PDF bytes into per-page positioned glyphs;
//! [`LineReconstructor`] clusters them into reading-order lines and
//! classifies headings by font size.
//!
//! # Pipeline
//!
//! ```text
//! PDF bytes → glyph source → flip Y → quantize into clusters → sort by X → lines
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use super::title::pdf_title;
use super::types::{Glyph, PageGlyphs, PdfPage, ReconstructedLine, StructuredPdfDocument};
use crate::config::{ExtractConfig, DEFAULT_HEADING_THRESHOLD, DEFAULT_LINE_TOLERANCE};
use crate::error::Result;

/// Decodes PDF bytes into one [`PageGlyphs`] per page, in page order.
///
/// Implementations are synchronous; callers run them on the blocking pool.
/// Any decoder failure should be reported as
/// [`ExtractError::PdfProcessing`](crate::error::ExtractError::PdfProcessing).
pub trait GlyphSource: Send + Sync {
    fn load(&self, bytes: &[u8]) -> Result<Vec<PageGlyphs>>;
}

/// Groups glyphs into lines by vertical position.
#[derive(Debug, Clone, Copy)]
pub struct LineReconstructor {
    /// Quantization step for the flipped Y coordinate.
    pub tolerance: f64,
    /// A line whose mean font size is strictly above this is a heading.
    pub heading_threshold: f64,
}

impl Default for LineReconstructor {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_LINE_TOLERANCE,
            heading_threshold: DEFAULT_HEADING_THRESHOLD,
        }
    }
}

impl LineReconstructor {
    pub fn from_config(config: &ExtractConfig) -> Self {
        Self {
            tolerance: config.line_tolerance,
            heading_threshold: config.heading_threshold,
        }
    }

    /// Reconstruct the lines of one page, top of page first.
    ///
    /// 1. Flip Y so that smaller values are higher on the page.
    /// 2. Round to the nearest multiple of `tolerance`; equal keys share a line.
    /// 3. Sort each line's glyphs left to right (stable) and join with spaces.
    #[allow(clippy::cast_precision_loss)]
    pub fn reconstruct(&self, page: &PageGlyphs) -> Vec<ReconstructedLine> {
        let mut clusters: BTreeMap<i64, Vec<&Glyph>> = BTreeMap::new();

        for glyph in &page.glyphs {
            let flipped = page.height - glyph.y;
            clusters
                .entry(self.cluster_index(flipped))
                .or_default()
                .push(glyph);
        }

        clusters
            .into_iter()
            .map(|(index, mut glyphs)| {
                glyphs.sort_by(|a, b| {
                    a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
                });
                self.build_line(&glyphs, index as f64 * self.tolerance)
            })
            .collect()
    }

    /// Index of the tolerance bucket nearest to `flipped_y`. Halves round up.
    #[allow(clippy::cast_possible_truncation)]
    fn cluster_index(&self, flipped_y: f64) -> i64 {
        (flipped_y / self.tolerance + 0.5).floor() as i64
    }

    /// Build a [`ReconstructedLine`] from an x-sorted, non-empty cluster.
    #[allow(clippy::cast_precision_loss)]
    fn build_line(&self, glyphs: &[&Glyph], y: f64) -> ReconstructedLine {
        let text = glyphs
            .iter()
            .map(|g| g.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let font_size = glyphs.iter().map(|g| g.font_size).sum::<f64>() / glyphs.len() as f64;

        ReconstructedLine {
            text,
            is_heading: font_size > self.heading_threshold,
            font_size,
            font_family: glyphs[0].font_family.clone(),
            y,
        }
    }

    /// Reconstruct every page and infer the document title.
    pub fn structure(&self, pages: &[PageGlyphs], file_name: &str) -> StructuredPdfDocument {
        let pages: Vec<PdfPage> = pages
            .iter()
            .zip(1u32..)
            .map(|(glyphs, page_number)| {
                let content = self.reconstruct(glyphs);
                debug!(
                    page = page_number,
                    glyphs = glyphs.glyphs.len(),
                    lines = content.len(),
                    "Reconstructed page"
                );
                PdfPage {
                    page_number,
                    content,
                }
            })
            .collect();

        let first_page = pages.first().map_or(&[][..], |p| p.content.as_slice());
        let title = pdf_title(first_page, file_name);

        StructuredPdfDocument {
            title,
            total_pages: u32::try_from(pages.len()).unwrap_or(u32::MAX),
            pages,
        }
    }
}
