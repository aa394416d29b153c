//! Validated request extraction.

use crate::error::{ApiError, ApiResult};
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

/// JSON body that has been deserialized and validated.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Build a typed candidate from client fields plus the server-derived image
/// name, then validate it once.
///
/// Any client-supplied `image` field is dropped; the only image a record can
/// reference is one the server stored.
pub fn build_candidate<T>(mut fields: Map<String, Value>, image: Option<&str>) -> ApiResult<T>
where
    T: DeserializeOwned + Validate,
{
    fields.remove("image");
    if let Some(name) = image {
        fields.insert("image".into(), Value::String(name.to_string()));
    }

    let candidate: T = serde_json::from_value(Value::Object(fields))
        .map_err(|err| ApiError::UnprocessableEntity(err.to_string()))?;
    candidate.validate()?;
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::payload::{NewCategory, NewProduct};
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_client_image_is_replaced() {
        let candidate: NewCategory =
            build_candidate(fields(json!({"name": "Lamps", "image": "../../etc/passwd"})), None)
                .unwrap();
        assert_eq!(candidate.image, None);

        let candidate: NewCategory =
            build_candidate(fields(json!({"name": "Lamps"})), Some("abc.png")).unwrap();
        assert_eq!(candidate.image.as_deref(), Some("abc.png"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = build_candidate::<NewProduct>(
            fields(json!({"title": "Lamp", "user": "someone-else"})),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_validation_errors_surface_as_fields() {
        let err = build_candidate::<NewProduct>(fields(json!({"title": ""})), None).unwrap_err();
        match err {
            ApiError::ValidationError(fields) => assert!(fields.contains_key("title")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
