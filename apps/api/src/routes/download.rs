use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::export::{
    attachment, docx_bytes, pdf_bytes, txt_bytes, DOCX_CONTENT_TYPE, DOCX_FILE_NAME,
    PDF_CONTENT_TYPE, PDF_FILE_NAME, TXT_CONTENT_TYPE, TXT_FILE_NAME,
};

/// Missing or empty `text` yields an empty document.
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub text: String,
}

/// POST /api/v1/download/txt
pub async fn handle_download_txt(Json(req): Json<DownloadRequest>) -> Response {
    file_response(TXT_CONTENT_TYPE, TXT_FILE_NAME, txt_bytes(&req.text))
}

/// POST /api/v1/download/docx
pub async fn handle_download_docx(Json(req): Json<DownloadRequest>) -> Result<Response, AppError> {
    let bytes = docx_bytes(&req.text)?;
    Ok(file_response(DOCX_CONTENT_TYPE, DOCX_FILE_NAME, bytes))
}

/// POST /api/v1/download/pdf
pub async fn handle_download_pdf(Json(req): Json<DownloadRequest>) -> Result<Response, AppError> {
    let text = req.text;
    // Page layout runs on the blocking pool.
    let bytes = tokio::task::spawn_blocking(move || pdf_bytes(&text))
        .await
        .map_err(anyhow::Error::from)??;
    Ok(file_response(PDF_CONTENT_TYPE, PDF_FILE_NAME, bytes))
}

fn file_response(content_type: &'static str, file_name: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, attachment(file_name)),
        ],
        bytes,
    )
        .into_response()
}
