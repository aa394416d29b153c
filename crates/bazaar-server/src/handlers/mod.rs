//! Request handlers.

pub mod categories;
pub mod products;
pub mod users;

use crate::{
    error::{ApiResult, ErrorContext},
    request::build_candidate,
    state::AppState,
    uploads::{FormInput, ReservedUpload},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

/// Parse a path id. A malformed id cannot name any record, so it is a 404.
pub(crate) fn parse_id(raw: &str, resource: &'static str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).not_found(resource)
}

/// Reserve a name for the uploaded file, validate the candidate built with
/// it, and only then write the bytes.
pub(crate) async fn stage_upload<T>(
    state: &AppState,
    form: FormInput,
) -> ApiResult<(T, Option<ReservedUpload>)>
where
    T: DeserializeOwned + Validate,
{
    let FormInput { fields, file } = form;
    let reserved = file
        .as_ref()
        .map(|file| state.uploads.reserve(&file.client_name));

    let candidate = build_candidate(fields, reserved.as_ref().map(ReservedUpload::name))?;

    if let (Some(upload), Some(file)) = (&reserved, file) {
        state.uploads.write(upload, file.bytes).await?;
    }

    Ok((candidate, reserved))
}

/// Remove a staged file when the record that would reference it was not stored.
pub(crate) async fn discard_on_error<R>(
    state: &AppState,
    upload: Option<ReservedUpload>,
    result: ApiResult<R>,
) -> ApiResult<R> {
    if result.is_err() {
        if let Some(upload) = &upload {
            state.uploads.discard(upload).await;
        }
    }
    result
}
