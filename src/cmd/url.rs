use anyhow::Result;

use pagetext::{ExtractConfig, Extractor};

use super::output::print_web;
use crate::OutputFormat;

pub async fn cmd_url(config: ExtractConfig, url: &str, format: OutputFormat) -> Result<()> {
    let extractor = Extractor::new(config)?;
    let page = extractor.extract_url(url).await?;
    print_web(&page, format)
}
