//! First-page rasterization via poppler's `pdftoppm`.
//!
//! The renderer works on files, so each call gets its own temporary directory holding
//! the uploaded PDF and the rendered JPEG. The directory is removed on return.

use std::path::{Path, PathBuf};
use std::process::Command;

use base64::{engine::general_purpose, Engine as _};
use tracing::debug;

use crate::extraction::{load_document, ExtractionError, ImageContent};

pub const JPEG_MIME: &str = "image/jpeg";

#[derive(Debug, Clone)]
pub struct RasterSettings {
    pub pdftoppm: PathBuf,
    pub dpi: u32,
}

/// Renders page 1 as a JPEG and returns it base64-encoded.
///
/// Fails with `NoPages` before invoking the renderer when the page tree parses and is
/// empty. Documents `lopdf` cannot parse still go to `pdftoppm`, which is more lenient
/// and is the only judge of whether a file can be rasterized.
pub fn rasterize_first_page(
    settings: &RasterSettings,
    pdf: &[u8],
) -> Result<ImageContent, ExtractionError> {
    match page_count(pdf) {
        Ok(0) => return Err(ExtractionError::NoPages),
        Ok(_) => {}
        Err(e) => debug!("Page tree unreadable ({e}); leaving it to the renderer"),
    }

    let jpeg = render_first_page(settings, pdf)?;
    debug!("Rasterized page 1 ({} JPEG bytes)", jpeg.len());

    Ok(encode_jpeg(&jpeg))
}

pub fn page_count(pdf: &[u8]) -> Result<usize, ExtractionError> {
    Ok(load_document(pdf)?.get_pages().len())
}

fn encode_jpeg(jpeg: &[u8]) -> ImageContent {
    ImageContent {
        mime_type: JPEG_MIME.to_string(),
        data: general_purpose::STANDARD.encode(jpeg),
    }
}

fn render_first_page(settings: &RasterSettings, pdf: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("resume.pdf");
    std::fs::write(&input, pdf)?;

    // -singlefile writes `<prefix>.jpg` without a page-number suffix
    let prefix = dir.path().join("page");
    run_pdftoppm(settings, &input, &prefix)?;

    let jpeg = std::fs::read(prefix.with_extension("jpg")).map_err(|e| {
        ExtractionError::Rasterize(format!("renderer produced no image: {e}"))
    })?;
    if jpeg.is_empty() {
        return Err(ExtractionError::Rasterize(
            "renderer produced an empty image".to_string(),
        ));
    }

    Ok(jpeg)
}

fn run_pdftoppm(
    settings: &RasterSettings,
    input: &Path,
    prefix: &Path,
) -> Result<(), ExtractionError> {
    let output = Command::new(&settings.pdftoppm)
        .arg("-jpeg")
        .arg("-singlefile")
        .args(["-f", "1", "-l", "1"])
        .arg("-r")
        .arg(settings.dpi.to_string())
        .arg(input)
        .arg(prefix)
        .output()
        .map_err(|e| {
            ExtractionError::Rasterize(format!(
                "failed to run {}: {e}",
                settings.pdftoppm.display()
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractionError::Rasterize(format!(
            "pdftoppm exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}
