use std::panic;

use actix_web::web;

use crate::errors::{AppError, AppResult};

/// An uploaded `pdf_file` part.
#[derive(Debug, Clone)]
pub struct PdfUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl PdfUpload {
    /// Rejects uploads that carry no file before any extraction happens.
    pub fn ensure_present(&self) -> AppResult<()> {
        if self.filename.trim().is_empty() {
            return Err(AppError::InputError("Tidak ada file yang dipilih.".to_string()));
        }
        if self.bytes.is_empty() {
            return Err(AppError::InputError(format!(
                "File '{}' kosong.",
                self.filename
            )));
        }
        Ok(())
    }
}

/// Extracts the text layer of a PDF on the blocking thread pool.
pub async fn extract_pdf_text(upload: PdfUpload) -> AppResult<String> {
    upload.ensure_present()?;

    let PdfUpload { filename, bytes } = upload;
    log::info!("Extracting text from '{}' ({} bytes)", filename, bytes.len());

    let text = web::block(move || read_text_layer(&bytes))
        .await
        .map_err(|e| AppError::InternalError(format!("PDF extraction task failed: {}", e)))?
        .map_err(|e| {
            AppError::InputError(format!("Gagal membaca file PDF '{}': {}", filename, e))
        })?;

    if text.trim().is_empty() {
        return Err(AppError::InputError(format!(
            "File PDF '{}' tidak berisi teks yang dapat dibaca.",
            filename
        )));
    }

    Ok(text)
}

/// pdf-extract panics on some malformed documents (fonts without
/// `/Subtype`, pages without `/Resources`); those count as unreadable input.
fn read_text_layer(bytes: &[u8]) -> Result<String, String> {
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(_) => Err("struktur PDF rusak".to_string()),
    }
}
