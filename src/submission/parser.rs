use std::collections::HashMap;

use axum::http::HeaderMap;
use bytes::Bytes;

use crate::error::AppError;

/// Part name of the optional logo upload.
pub const LOGO_FIELD: &str = "logo";
/// Part name of each supporting document; may repeat.
pub const DOCUMENTS_FIELD: &str = "documents";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A decoded multipart intake request, before any validation.
#[derive(Debug, Default)]
pub struct IntakeForm {
    pub fields: HashMap<String, String>,
    pub logo: Option<UploadedFile>,
    pub documents: Vec<UploadedFile>,
}

/// Parse multipart form data using multer. Stream errors are 400; a second
/// logo part is 422.
pub async fn parse_multipart(headers: &HeaderMap, body: Bytes) -> Result<IntakeForm, AppError> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| AppError::BadRequest("Missing multipart boundary".to_string()))?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = IntakeForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("unknown").to_string();

        if name == LOGO_FIELD || name == DOCUMENTS_FIELD {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(|m| m.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("File read error: {e}")))?;

            // Browsers send an empty part for a file input left blank.
            if filename.is_empty() && data.is_empty() {
                continue;
            }

            let file = UploadedFile {
                filename: if filename.is_empty() { name.clone() } else { filename },
                content_type,
                data,
            };

            if name == LOGO_FIELD {
                if form.logo.is_some() {
                    return Err(AppError::Validation(
                        "Only one logo file may be uploaded".to_string(),
                    ));
                }
                form.logo = Some(file);
            } else {
                form.documents.push(file);
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Field read error: {e}")))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
