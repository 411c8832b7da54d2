//! Model file upload.

use super::AppState;
use crate::{
    core::storage::StoredObject,
    errors::{Error, Result},
};
use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State},
};

/// A file part pulled out of a multipart form
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Reads a multipart form, returning the `file` part and the text fields.
pub(crate) async fn read_form(
    mut multipart: Multipart,
) -> Result<(UploadedFile, Vec<(String, String)>)> {
    let mut file = None;
    let mut fields = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| Error::validation("Uploaded file has no name"))?;
            let bytes = field.bytes().await?;
            file = Some(UploadedFile { file_name, bytes });
        } else {
            fields.push((name, field.text().await?));
        }
    }

    let file = file.ok_or_else(|| Error::validation("Missing required field: file"))?;
    Ok((file, fields))
}

/// `POST /api/boxprint/upload`
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<StoredObject>> {
    let (file, fields) = read_form(multipart).await?;
    let order_number = fields
        .into_iter()
        .find(|(name, _)| name == "order_number")
        .map(|(_, value)| value);

    let stored = state
        .storage
        .put(order_number.as_deref(), &file.file_name, &file.bytes)
        .await?;
    Ok(Json(stored))
}
