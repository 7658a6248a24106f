use std::path::Path;

use anyhow::Result;

use pagetext::{ExtractConfig, ExtractError, Extractor};

use super::output::print_pdf;
use crate::OutputFormat;

pub async fn cmd_pdf(
    config: ExtractConfig,
    file: &Path,
    name: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let extractor = Extractor::new(config)?;

    let document = match name {
        Some(name) => {
            let bytes = tokio::fs::read(file).await.map_err(|e| {
                ExtractError::PdfProcessing(format!("failed to read {}: {e}", file.display()))
            })?;
            extractor.extract_pdf_bytes(bytes, name).await?
        }
        None => extractor.extract_pdf_file(file).await?,
    };

    print_pdf(&document, format)
}
