//! Response builder utilities.

use super::types::{ApiResponse, Message};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 200 with the success envelope.
pub fn ok<T: Serialize>(data: T) -> Response {
    with_status(StatusCode::OK, data)
}

/// Create a 201 Created response.
pub fn created<T: Serialize>(data: T) -> Response {
    with_status(StatusCode::CREATED, data)
}

/// 200 list response.
pub fn list<T: Serialize>(items: Vec<T>) -> Response {
    (StatusCode::OK, Json(ApiResponse::list(items))).into_response()
}

/// 200 with `{message}` as data.
pub fn message(text: impl Into<String>) -> Response {
    ok(Message::new(text))
}

fn with_status<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(ApiResponse::success(data))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body(res: Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_created_envelope() {
        let res = created(serde_json::json!({"id": 1}));
        assert_eq!(res.status(), StatusCode::CREATED);

        let json = body(res).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], 1);
        assert!(json["meta"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_list_counts_items() {
        let json = body(list(vec![1, 2, 3])).await;
        assert_eq!(json["meta"]["count"], 3);
    }
}
