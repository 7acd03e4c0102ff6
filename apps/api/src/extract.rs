//! Text extraction for uploaded resumes (PDF, DOCX, plain text).
//!
//! A document that cannot be parsed yields an empty string rather than an error,
//! so the analysis reports it as missing resume text.

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format: {0}. Upload a PDF, DOCX or TXT file")]
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractError> {
        let ext = std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            "txt" | "md" => Ok(DocumentKind::PlainText),
            _ => Err(ExtractError::Unsupported(file_name.to_string())),
        }
    }
}

/// Extracts and trims the text of `bytes`, dispatching on the file extension.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let kind = DocumentKind::from_file_name(file_name)?;

    let raw = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes).unwrap_or_else(|e| {
            warn!("Failed to extract text from PDF '{}': {}", file_name, e);
            String::new()
        }),
        DocumentKind::Docx => docx_text(bytes).unwrap_or_else(|e| {
            warn!("Failed to read DOCX '{}': {}", file_name, e);
            String::new()
        }),
        DocumentKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };

    let text = raw.trim().to_string();
    debug!("Extracted {} chars from '{}' ({:?})", text.len(), file_name, kind);
    Ok(text)
}

/// Runs `extract_text` on the blocking pool. A parser panic is logged and
/// treated as an unreadable document.
pub async fn extract_text_blocking(
    file_name: String,
    bytes: Vec<u8>,
) -> Result<String, ExtractError> {
    let name = file_name.clone();
    match tokio::task::spawn_blocking(move || extract_text(&file_name, &bytes)).await {
        Ok(result) => result,
        Err(e) => {
            warn!("Text extraction for '{}' aborted: {}", name, e);
            Ok(String::new())
        }
    }
}

/// Paragraph text of a DOCX body, one paragraph per line.
fn docx_text(bytes: &[u8]) -> Result<String, docx_rs::ReaderError> {
    let docx = docx_rs::read_docx(bytes)?;
    let mut lines = Vec::new();

    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for p_child in &paragraph.children {
                if let ParagraphChild::Run(run) = p_child {
                    for r_child in &run.children {
                        match r_child {
                            RunChild::Text(t) => line.push_str(&t.text),
                            RunChild::Tab(_) => line.push('\t'),
                            _ => {}
                        }
                    }
                }
            }
            lines.push(line);
        }
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::docx_bytes;

    #[test]
    fn test_kind_from_extension_is_case_insensitive() {
        assert_eq!(
            DocumentKind::from_file_name("Resume.PDF").unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::from_file_name("cv.docx").unwrap(),
            DocumentKind::Docx
        );
        assert_eq!(
            DocumentKind::from_file_name("notes.txt").unwrap(),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            extract_text("resume.odt", b"whatever"),
            Err(ExtractError::Unsupported(_))
        ));
        assert!(DocumentKind::from_file_name("no_extension").is_err());
    }

    #[test]
    fn test_plain_text_is_trimmed() {
        let text = extract_text("resume.txt", b"\n\n  Jane Doe\nData Analyst  \n\t").unwrap();
        assert_eq!(text, "Jane Doe\nData Analyst");
    }

    #[test]
    fn test_whitespace_only_document_is_empty() {
        assert_eq!(extract_text("blank.txt", b" \n \t ").unwrap(), "");
    }

    #[tokio::test]
    async fn test_corrupt_pdf_yields_empty_text() {
        let text = extract_text_blocking("broken.pdf".to_string(), b"not a pdf".to_vec())
            .await
            .unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_corrupt_docx_yields_empty_text() {
        assert_eq!(extract_text("broken.docx", b"not a zip").unwrap(), "");
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let bytes = docx_bytes("SUMMARY\nData analyst with Tableau").unwrap();
        let text = extract_text("cv.docx", &bytes).unwrap();
        assert_eq!(text, "SUMMARY\nData analyst with Tableau");
    }

    #[tokio::test]
    async fn test_blocking_wrapper() {
        let text = extract_text_blocking("r.txt".to_string(), b" Python ".to_vec())
            .await
            .unwrap();
        assert_eq!(text, "Python");
    }
}
