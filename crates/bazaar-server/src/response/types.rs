//! Standard API response types.

use serde::Serialize;

/// Standard API response envelope for successful requests.
///
/// Failures use the same `success` flag but are rendered by
/// [`ApiError`](crate::error::ApiError).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true` for this envelope.
    pub success: bool,
    pub data: T,
    pub meta: ResponseMeta,
}

/// Response metadata.
#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    /// Response timestamp.
    pub timestamp: String,
    /// Number of items for list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Acknowledgement body for operations without a record to return.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: ResponseMeta::now(),
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Successful list response, with the item count in `meta`.
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            success: true,
            data: items,
            meta: ResponseMeta {
                count: Some(count),
                ..ResponseMeta::now()
            },
        }
    }
}

impl ResponseMeta {
    /// Create metadata with current timestamp.
    pub fn now() -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            count: None,
        }
    }
}
