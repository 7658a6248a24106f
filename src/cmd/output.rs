use anyhow::Result;
use serde_json::json;

use pagetext::{ExtractError, StructuredPdfDocument, WebExtraction};

use crate::OutputFormat;

pub fn print_web(page: &WebExtraction, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(page)?),
        OutputFormat::Text => {
            if !page.title.is_empty() {
                println!("{}\n", page.title);
            }
            println!("{}", page.text_content);
        }
    }
    Ok(())
}

pub fn print_pdf(document: &StructuredPdfDocument, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(document)?),
        OutputFormat::Text => print!("{}", document.to_text()),
    }
    Ok(())
}

/// Report a failure on stderr. Extraction errors already fold their cause
/// into the message; other errors print their full context chain.
pub fn print_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match err.downcast_ref::<ExtractError>() {
        Some(extract_err) => extract_err.to_string(),
        None => format!("{err:#}"),
    };
    match format {
        OutputFormat::Json => eprintln!("{}", json!({ "error": message })),
        OutputFormat::Text => eprintln!("Error: {message}"),
    }
}
