//! PDF Extractor — turns uploaded resume bytes into content the model can consume.
//!
//! Two modes, never mixed within one request:
//! - [`raster`] renders the first page to a base64 JPEG for visual inspection
//! - [`text`] concatenates the extractable text of every page

use std::path::PathBuf;

use thiserror::Error;

pub mod raster;
pub mod text;

#[cfg(test)]
pub(crate) mod fixtures;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not open PDF: {0}")]
    Open(String),

    #[error("PDF has no pages")]
    NoPages,

    #[error("failed to rasterize first page: {0}")]
    Rasterize(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction task failed: {0}")]
    Task(String),
}

/// A single base64-encoded image part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageContent {
    pub mime_type: String,
    pub data: String,
}

/// Resume content in the form sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedContent {
    Image(ImageContent),
    Text(String),
}

impl ExtractedContent {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractedContent::Image(_) => "image",
            ExtractedContent::Text(_) => "text",
        }
    }
}

/// The extraction capability used by the evaluation pipeline.
/// Both methods are blocking; callers run them off the async runtime.
pub trait PdfExtractor: Send + Sync {
    fn rasterize_first_page(&self, pdf: &[u8]) -> Result<ImageContent, ExtractionError>;

    fn extract_text(&self, pdf: &[u8]) -> Result<String, ExtractionError>;
}

/// Production extractor: `lopdf` for parsing and text, poppler's `pdftoppm` for rendering.
#[derive(Debug, Clone)]
pub struct PopplerExtractor {
    settings: raster::RasterSettings,
}

impl PopplerExtractor {
    pub fn new(pdftoppm: PathBuf, dpi: u32) -> Self {
        Self {
            settings: raster::RasterSettings { pdftoppm, dpi },
        }
    }
}

impl PdfExtractor for PopplerExtractor {
    fn rasterize_first_page(&self, pdf: &[u8]) -> Result<ImageContent, ExtractionError> {
        raster::rasterize_first_page(&self.settings, pdf)
    }

    fn extract_text(&self, pdf: &[u8]) -> Result<String, ExtractionError> {
        text::extract_text(pdf)
    }
}

/// Readers accept a `%PDF-` header anywhere in the first 1024 bytes.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Loads a PDF from memory, mapping parse failures to `ExtractionError::Open`.
/// Junk before the header is skipped; the original error is kept if that fails too.
pub(crate) fn load_document(pdf: &[u8]) -> Result<lopdf::Document, ExtractionError> {
    let err = match lopdf::Document::load_mem(pdf) {
        Ok(doc) => return Ok(doc),
        Err(e) => ExtractionError::Open(e.to_string()),
    };

    match header_offset(pdf) {
        Some(offset) if offset > 0 => lopdf::Document::load_mem(&pdf[offset..]).map_err(|_| err),
        _ => Err(err),
    }
}

fn header_offset(pdf: &[u8]) -> Option<usize> {
    let window = &pdf[..pdf.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(5).position(|w| w == b"%PDF-")
}
