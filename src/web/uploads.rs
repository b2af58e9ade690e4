use actix_multipart::Multipart;
use futures_util::TryStreamExt;

use std::collections::HashMap;

use crate::common::FormError;

/// Text fields are small; anything bigger is not a form we render.
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A decoded `multipart/form-data` body: text fields plus at most one file.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Reads the whole multipart body.
///
/// The part named `file_field` is collected as the upload, capped at
/// `max_file_bytes`; a file input left empty yields no file.
pub async fn read_upload_form(
    mut payload: Multipart,
    file_field: &str,
    max_file_bytes: usize,
) -> Result<UploadForm, FormError> {
    let mut form = UploadForm::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| FormError::Malformed(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let is_file = name == file_field;
        let limit = if is_file {
            max_file_bytes
        } else {
            MAX_TEXT_FIELD_BYTES
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| FormError::Malformed(e.to_string()))?
        {
            if bytes.len() + chunk.len() > limit {
                return Err(FormError::TooLarge(limit));
            }
            bytes.extend_from_slice(&chunk);
        }

        if is_file {
            let filename = filename.unwrap_or_default();
            if filename.trim().is_empty() || bytes.is_empty() {
                continue;
            }
            form.file = Some(UploadedFile {
                filename,
                content_type,
                bytes,
            });
        } else {
            let value =
                String::from_utf8(bytes).map_err(|_| FormError::Malformed(format!("field {name}")))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
