//! Form extraction for endpoints that accept an optional image.
//!
//! The same route takes either a JSON object or `multipart/form-data` whose
//! text parts are fields and whose `image` part is a file. Nothing here
//! validates the fields; that happens once the stored file name is known.

use crate::error::{ApiError, ApiResult};
use axum::{
    async_trait,
    extract::{FromRef, FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use bytes::{Bytes, BytesMut};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Part name carrying the uploaded file.
pub const IMAGE_FIELD: &str = "image";

/// Largest accepted file, taken from router state.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_file_bytes: usize,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub client_name: String,
    pub bytes: Bytes,
}

/// Unvalidated client fields plus an optional file.
#[derive(Debug, Default)]
pub struct FormInput {
    pub fields: Map<String, Value>,
    pub file: Option<UploadedFile>,
}

#[async_trait]
impl<S> FromRequest<S> for FormInput
where
    S: Send + Sync,
    UploadLimits: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let limits = UploadLimits::from_ref(state);
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
            read_multipart(multipart, limits).await
        } else {
            let Json(fields) = Json::<Map<String, Value>>::from_request(req, state).await?;
            Ok(Self { fields, file: None })
        }
    }
}

async fn read_multipart(mut multipart: Multipart, limits: UploadLimits) -> ApiResult<FormInput> {
    let mut input = FormInput::default();

    while let Some(mut field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        let Some(client_name) = field.file_name().map(str::to_owned) else {
            let text = field.text().await?;
            input.fields.insert(name, Value::String(text));
            continue;
        };

        if name != IMAGE_FIELD {
            return Err(ApiError::BadRequest(format!("unexpected file part '{name}'")));
        }
        if input.file.is_some() {
            return Err(ApiError::BadRequest("only one image may be uploaded".into()));
        }

        let mut buf = BytesMut::new();
        while let Some(chunk) = field.chunk().await? {
            if buf.len() + chunk.len() > limits.max_file_bytes {
                return Err(file_too_large(limits.max_file_bytes));
            }
            buf.extend_from_slice(&chunk);
        }

        // Browsers send an empty part when no file was picked.
        if client_name.is_empty() && buf.is_empty() {
            continue;
        }

        input.file = Some(UploadedFile {
            client_name,
            bytes: buf.freeze(),
        });
    }

    Ok(input)
}

fn file_too_large(max: usize) -> ApiError {
    ApiError::ValidationError(HashMap::from([(
        IMAGE_FIELD.to_string(),
        vec![format!("image must be at most {max} bytes")],
    )]))
}
