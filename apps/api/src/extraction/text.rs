//! Plain-text extraction across every page of a resume.

use tracing::debug;

use crate::extraction::{load_document, ExtractionError};

/// Returns the concatenated text of every page, in page order, with no separator.
/// Pages without extractable text (e.g. scanned images) contribute an empty string.
pub fn extract_text(pdf: &[u8]) -> Result<String, ExtractionError> {
    Ok(page_texts(pdf)?.concat())
}

/// Per-page text in page order. A page that fails to decode yields `""`.
pub fn page_texts(pdf: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let doc = load_document(pdf)?;

    // get_pages() is a BTreeMap keyed by 1-based page number, so iteration is in page order
    let texts = doc
        .get_pages()
        .keys()
        .map(|&page| match doc.extract_text(&[page]) {
            Ok(text) => text,
            Err(e) => {
                debug!("No extractable text on page {page}: {e}");
                String::new()
            }
        })
        .collect();

    Ok(texts)
}
