//! PDF text extraction.
//!
//! `pdf-extract` is synchronous and CPU-bound, so the work runs on the
//! blocking pool. An image-only (scanned) PDF extracts successfully but
//! yields an empty or whitespace transcript; the caller decides what to do
//! with that.

use anyhow::{anyhow, Context, Result};

pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String> {
    let text = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| anyhow!("failed to extract text from PDF: {e}"))
    })
    .await
    .context("PDF extraction task panicked")??;

    Ok(text)
}
