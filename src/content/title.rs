//! Document title inference.

use super::types::ReconstructedLine;

/// Title used when nothing better can be derived.
pub const UNTITLED: &str = "Untitled Document";

/// Infer a PDF title from the first page's lines and the original file name.
///
/// First match wins: first heading line, first line of any kind, file base
/// name without its extension, [`UNTITLED`]. Candidates that are blank after
/// trimming are skipped.
pub fn pdf_title(first_page: &[ReconstructedLine], file_name: &str) -> String {
    let non_blank = |line: &&ReconstructedLine| !line.text.trim().is_empty();

    first_page
        .iter()
        .filter(non_blank)
        .find(|line| line.is_heading)
        .or_else(|| first_page.iter().find(non_blank))
        .map(|line| line.text.trim().to_string())
        .or_else(|| title_from_file_name(file_name))
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Base name of `file_name` with the last extension removed.
///
/// `"uploads/report.v2.pdf"` → `"report.v2"`. Returns `None` when nothing is
/// left (empty path, `".pdf"`).
fn title_from_file_name(file_name: &str) -> Option<String> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stem = match base.rfind('.') {
        Some(dot) if dot + 1 < base.len() => &base[..dot],
        _ => base,
    };
    (!stem.is_empty()).then(|| stem.to_string())
}
