use crate::common::error::{AppError, AppResult};
use axum::{
    body::Bytes,
    extract::{Multipart, multipart::MultipartError},
    http::StatusCode,
};
use bytes::BytesMut;
use tracing::{debug, info};

/// A file part pulled out of a multipart request, held in memory until the
/// pipeline decides where it goes.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Declared by the client. Untrusted; only ever logged.
    pub file_name: Option<String>,
    /// Declared by the client, passed through verbatim to storage.
    pub content_type: String,
    pub body: Bytes,
}

impl Upload {
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Reads the file part named `field_name`, failing with `PayloadTooLarge` as
/// soon as more than `max_bytes` have arrived. Nothing touches the disk here.
pub async fn read_file_field(
    multipart: &mut Multipart,
    field_name: &str,
    max_bytes: usize,
) -> AppResult<Upload> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(field_name) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().unwrap_or_default().to_string();
        info!(
            field = field_name,
            file_name = file_name.as_deref().unwrap_or("<none>"),
            content_type = %content_type,
            "Receiving upload"
        );

        let mut buffer = BytesMut::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?
        {
            if buffer.len() + chunk.len() > max_bytes {
                return Err(AppError::PayloadTooLarge { limit: max_bytes });
            }
            buffer.extend_from_slice(&chunk);
        }

        return Ok(Upload {
            file_name,
            content_type,
            body: buffer.freeze(),
        });
    }

    Err(AppError::BadRequest(format!(
        "No {} field found in multipart request",
        field_name
    )))
}

fn multipart_error(e: MultipartError, max_bytes: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit: max_bytes }
    } else {
        AppError::BadRequest(format!("Couldn't parse multipart form: {}", e.body_text()))
    }
}
