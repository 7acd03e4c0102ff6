use std::collections::HashMap;

use axum::extract::Multipart;

use crate::errors::AppError;

/// Uploads above this size are rejected by the router's body limit.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A multipart form with at most one file part (named `file`) plus text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("file part has no file name".to_string()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                form.file = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid field '{name}': {e}")))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn require_file(&mut self) -> Result<UploadedFile, AppError> {
        self.file
            .take()
            .ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Parses an optional integer id field; blank counts as absent.
    pub fn optional_id(&self, name: &str) -> Result<Option<i64>, AppError> {
        match self.text(name).map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => v
                .parse::<i64>()
                .map(Some)
                .map_err(|_| AppError::Validation(format!("'{name}' must be an integer id"))),
            None => Ok(None),
        }
    }
}
