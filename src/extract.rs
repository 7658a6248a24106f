//! Extraction entry point.
//!
//! [`Extractor`] validates input and dispatches to the web pipeline (through
//! the [`RetryController`]) or the PDF pipeline (glyph decoding and line
//! reconstruction on the blocking pool).

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};
use url::Url;

use crate::config::ExtractConfig;
use crate::content::pdf::{GlyphSource, LineReconstructor};
use crate::content::types::{Extraction, ExtractionRequest, StructuredPdfDocument, WebExtraction};
use crate::error::{ExtractError, Result};
use crate::render::{renderer_for, PageRenderer};
use crate::retry::RetryController;

/// Check that `input` is an absolute `http`/`https` URL.
///
/// # Errors
///
/// Returns [`ExtractError::InvalidInput`] for empty input, input that does
/// not start with `http`, unparseable URLs, and other schemes.
pub fn validate_url(input: &str) -> Result<Url> {
    if input.is_empty() {
        return Err(ExtractError::InvalidInput("URL is empty".into()));
    }
    if !input.starts_with("http") {
        return Err(ExtractError::InvalidInput(input.to_string()));
    }

    let url =
        Url::parse(input).map_err(|e| ExtractError::InvalidInput(format!("{input} ({e})")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ExtractError::InvalidInput(format!(
            "{input} (unsupported scheme `{other}`)"
        ))),
    }
}

/// Runs web and PDF extractions with one configuration.
pub struct Extractor {
    config: ExtractConfig,
    retry: RetryController,
    glyph_source: Option<Arc<dyn GlyphSource>>,
}

impl Extractor {
    /// Build an extractor with the renderer selected in `config` and, when
    /// compiled with the `pdf` feature, the pdfium glyph source.
    ///
    /// # Errors
    ///
    /// Fails if the configured renderer is not compiled in.
    pub fn new(config: ExtractConfig) -> anyhow::Result<Self> {
        let renderer = renderer_for(&config)?;
        let extractor = Self::with_renderer(config, renderer);

        #[cfg(feature = "pdf")]
        let extractor = {
            let source = crate::content::pdfium::PdfiumGlyphSource::new(
                extractor.config.pdfium_library_path.clone(),
            );
            extractor.with_glyph_source(Arc::new(source))
        };

        Ok(extractor)
    }

    /// Build an extractor around an explicit renderer, with no PDF support.
    pub fn with_renderer(config: ExtractConfig, renderer: Arc<dyn PageRenderer>) -> Self {
        Self {
            retry: RetryController::new(renderer, &config),
            config,
            glyph_source: None,
        }
    }

    #[must_use]
    pub fn with_glyph_source(mut self, source: Arc<dyn GlyphSource>) -> Self {
        self.glyph_source = Some(source);
        self
    }

    /// Extract the visible text of a web page.
    ///
    /// Invalid URLs are rejected before any browsing session is opened.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn extract_url(&self, url: &str) -> Result<WebExtraction> {
        let url = validate_url(url)?;
        self.retry.extract(&url).await
    }

    /// Extract structured lines from in-memory PDF bytes.
    ///
    /// `file_name` is used only as the title fallback.
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub async fn extract_pdf_bytes(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<StructuredPdfDocument> {
        let source = self.glyph_source.clone().ok_or_else(|| {
            ExtractError::PdfProcessing(
                "PDF support not compiled in (build with `--features pdf`)".into(),
            )
        })?;
        let reconstructor = LineReconstructor::from_config(&self.config);
        let file_name = file_name.to_string();

        let document = tokio::task::spawn_blocking(move || {
            let pages = source.load(&bytes).map_err(into_pdf_error)?;
            Ok::<_, ExtractError>(reconstructor.structure(&pages, &file_name))
        })
        .await
        .map_err(|e| ExtractError::PdfProcessing(format!("decoder task failed: {e}")))??;

        info!(
            pages = document.total_pages,
            title = %document.title,
            "PDF extracted"
        );
        Ok(document)
    }

    /// Read a PDF from disk and extract it.
    pub async fn extract_pdf_file(&self, path: &Path) -> Result<StructuredPdfDocument> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ExtractError::PdfProcessing(format!("failed to read {}: {e}", path.display()))
        })?;
        self.extract_pdf_bytes(bytes, &path.to_string_lossy()).await
    }

    /// Dispatch a request to the matching pipeline.
    pub async fn extract(&self, request: ExtractionRequest) -> Result<Extraction> {
        match request {
            ExtractionRequest::Url(url) => self.extract_url(&url).await.map(Extraction::Web),
            ExtractionRequest::File(path) => {
                self.extract_pdf_file(&path).await.map(Extraction::Pdf)
            }
            ExtractionRequest::Bytes { bytes, file_name } => self
                .extract_pdf_bytes(bytes, &file_name)
                .await
                .map(Extraction::Pdf),
        }
    }
}

/// Decoder failures always surface as PDF processing errors.
fn into_pdf_error(err: ExtractError) -> ExtractError {
    match err {
        ExtractError::PdfProcessing(_) => err,
        other => ExtractError::PdfProcessing(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::types::{Glyph, PageGlyphs};
    use crate::retry::testing::{ScriptedRenderer, Step};

    struct FixedSource(Vec<PageGlyphs>);

    impl GlyphSource for FixedSource {
        fn load(&self, _bytes: &[u8]) -> Result<Vec<PageGlyphs>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSource;

    impl GlyphSource for BrokenSource {
        fn load(&self, _bytes: &[u8]) -> Result<Vec<PageGlyphs>> {
            Err(ExtractError::PdfProcessing("Invalid PDF structure".into()))
        }
    }

    fn glyph(text: &str, size: f64, x: f64, y: f64) -> Glyph {
        Glyph::from_transform(text, [size, 0.0, 0.0, size, x, y], "Helvetica")
    }

    fn extractor(renderer: &Arc<ScriptedRenderer>) -> Extractor {
        Extractor::with_renderer(
            ExtractConfig::default(),
            Arc::clone(renderer) as Arc<dyn PageRenderer>,
        )
    }

    // ─── URL validation ───

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/a?b=c").is_ok());
    }

    #[test]
    fn rejects_malformed_urls() {
        for input in ["", "ftp://example.com", "example.com", "http//broken", "https://"] {
            let err = validate_url(input).unwrap_err();
            assert!(err.is_client_error(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn rejects_http_prefixed_non_http_scheme() {
        assert!(validate_url("httpx://example.com").is_err());
    }

    #[tokio::test]
    async fn invalid_url_opens_no_session() {
        let renderer = Arc::new(ScriptedRenderer::new([Step::Page("never")]));
        let err = extractor(&renderer).extract_url("notaurl").await.unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput(_)));
        assert_eq!(renderer.opened(), 0);
    }

    // ─── Web ───

    #[tokio::test]
    async fn extract_dispatches_urls_to_the_web_pipeline() {
        let renderer = Arc::new(ScriptedRenderer::new([Step::NavFail, Step::Page("Body")]));
        let result = extractor(&renderer)
            .extract(ExtractionRequest::Url("https://example.com".into()))
            .await
            .unwrap();
        match result {
            Extraction::Web(web) => assert_eq!(web.text_content, "Body"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(renderer.closed(), 2);
    }

    // ─── PDF ───

    #[tokio::test]
    async fn pdf_without_source_fails() {
        let renderer = Arc::new(ScriptedRenderer::new([]));
        let err = extractor(&renderer)
            .extract_pdf_bytes(b"%PDF-1.7".to_vec(), "a.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::PdfProcessing(_)));
    }

    #[tokio::test]
    async fn pdf_bytes_are_structured() {
        let renderer = Arc::new(ScriptedRenderer::new([]));
        let source = FixedSource(vec![
            PageGlyphs {
                height: 800.0,
                glyphs: vec![
                    glyph("Title", 18.0, 100.0, 750.0),
                    glyph("Body", 10.0, 100.0, 700.0),
                ],
            },
            PageGlyphs {
                height: 800.0,
                glyphs: vec![glyph("More", 10.0, 100.0, 700.0)],
            },
        ]);
        let doc = extractor(&renderer)
            .with_glyph_source(Arc::new(source))
            .extract_pdf_bytes(Vec::new(), "report.pdf")
            .await
            .unwrap();
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.total_pages, 2);
        assert_eq!(doc.pages[1].page_number, 2);
        assert_eq!(doc.pages[1].content[0].text, "More");
    }

    #[tokio::test]
    async fn pdf_without_text_falls_back_to_file_name() {
        let renderer = Arc::new(ScriptedRenderer::new([]));
        let source = FixedSource(vec![PageGlyphs {
            height: 800.0,
            glyphs: Vec::new(),
        }]);
        let doc = extractor(&renderer)
            .with_glyph_source(Arc::new(source))
            .extract(ExtractionRequest::Bytes {
                bytes: Vec::new(),
                file_name: "scan.pdf".into(),
            })
            .await
            .unwrap();
        match doc {
            Extraction::Pdf(doc) => assert_eq!(doc.title, "scan"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn decoder_errors_are_pdf_processing_errors() {
        let renderer = Arc::new(ScriptedRenderer::new([]));
        let err = extractor(&renderer)
            .with_glyph_source(Arc::new(BrokenSource))
            .extract_pdf_bytes(b"garbage".to_vec(), "bad.pdf")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "PDF processing failed: Invalid PDF structure");
    }

    #[tokio::test]
    async fn missing_file_is_pdf_processing_error() {
        let renderer = Arc::new(ScriptedRenderer::new([]));
        let err = extractor(&renderer)
            .with_glyph_source(Arc::new(BrokenSource))
            .extract_pdf_file(Path::new("/nonexistent/pagetext/missing.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::PdfProcessing(_)));
    }
}
