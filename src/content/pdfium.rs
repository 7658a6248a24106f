//! Glyph source backed by `pdfium-render` (Chromium's PDF library).
//!
//! Each text object on a page becomes one [`Glyph`]. Its transform is the
//! object's matrix scaled by the font size, so the glyph's size is the
//! rendered size rather than the nominal one.

use std::path::PathBuf;

use pdfium_render::prelude::*;
use tracing::debug;

use super::pdf::GlyphSource;
use super::types::{Glyph, PageGlyphs};
use crate::error::{ExtractError, Result};

fn pdf_error(context: &str, err: impl std::fmt::Display) -> ExtractError {
    ExtractError::PdfProcessing(format!("{context}: {err}"))
}

/// Loads glyph runs through a pdfium shared library.
///
/// With a `library_dir`, the library is looked up there first; otherwise
/// (or if that fails) the system library path is used.
#[derive(Debug, Default, Clone)]
pub struct PdfiumGlyphSource {
    library_dir: Option<PathBuf>,
}

impl PdfiumGlyphSource {
    pub fn new(library_dir: Option<PathBuf>) -> Self {
        Self { library_dir }
    }

    fn bind(&self) -> Result<Pdfium> {
        let bindings = match &self.library_dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                .or_else(|_| Pdfium::bind_to_system_library()),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| pdf_error("failed to load pdfium", e))?;
        Ok(Pdfium::new(bindings))
    }
}

impl GlyphSource for PdfiumGlyphSource {
    #[allow(deprecated)] // PdfFont::name, kept for 0.8.x compatibility
    fn load(&self, bytes: &[u8]) -> Result<Vec<PageGlyphs>> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| pdf_error("failed to parse PDF", e))?;

        let mut pages = Vec::new();
        for page in document.pages().iter() {
            let mut glyphs = Vec::new();
            for object in page.objects().iter() {
                let Some(text_object) = object.as_text_object() else {
                    continue;
                };
                let matrix = text_object
                    .matrix()
                    .map_err(|e| pdf_error("failed to read text matrix", e))?;
                let size = f64::from(text_object.unscaled_font_size().value);
                let transform = [
                    f64::from(matrix.a()) * size,
                    f64::from(matrix.b()) * size,
                    f64::from(matrix.c()) * size,
                    f64::from(matrix.d()) * size,
                    f64::from(matrix.e()),
                    f64::from(matrix.f()),
                ];
                glyphs.push(Glyph::from_transform(
                    text_object.text(),
                    transform,
                    text_object.font().name(),
                ));
            }

            debug!(glyphs = glyphs.len(), "Page decoded");
            pages.push(PageGlyphs {
                height: f64::from(page.height().value),
                glyphs,
            });
        }

        Ok(pages)
    }
}
