use std::collections::HashMap;
use std::sync::OnceLock;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

use crate::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, message) = match self {
            ApiError::AuthError(message) => (StatusCode::UNAUTHORIZED, message),
            ApiError::ForbiddenError(message) => {
                (StatusCode::FORBIDDEN, message)
            }
            ApiError::ClientError(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFoundError(message) => (StatusCode::NOT_FOUND, message),
            ApiError::ServerError(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

pub trait IntoApiResponse<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T>;
}

const FALLBACK_MESSAGE: &str = "Internal Server Error";

fn error_messages() -> &'static HashMap<String, String> {
    static MESSAGES: OnceLock<HashMap<String, String>> = OnceLock::new();
    MESSAGES.get_or_init(|| {
        serde_json::from_str(include_str!("error-code.json"))
            .unwrap_or_default()
    })
}

/// Public message for `error_code`; codes starting with `4` are client
/// errors, everything else is a server error.
pub(crate) fn api_error(error_code: &str) -> ApiError {
    let message = error_messages()
        .get(error_code)
        .map(String::as_str)
        .unwrap_or(FALLBACK_MESSAGE)
        .to_string();

    match error_code.as_bytes().first() {
        Some(&b'4') => ApiError::ClientError(message),
        _ => ApiError::ServerError(message),
    }
}

impl<T> IntoApiResponse<T> for anyhow::Result<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T> {
        self.map_err(|e| {
            error!(error_code, "{:?}", e);
            api_error(error_code)
        })
    }
}

#[cfg(test)]
mod test {
    use anyhow::anyhow;
    use axum::body::to_bytes;

    use super::*;

    #[test]
    fn test_error_code_table_parses() {
        let messages = error_messages();

        assert!(!messages.is_empty());
        assert_eq!(messages["500-001"], "Failed to fetch posts");
    }

    #[test]
    fn test_into_api_response_maps_code() {
        let server: anyhow::Result<()> = Err(anyhow!("connection reset"));
        let client: anyhow::Result<()> = Err(anyhow!("bad input"));

        assert!(matches!(
            IntoApiResponse::into_response(server, "500-004"),
            Err(ApiError::ServerError(m)) if m == "検索に失敗しました"
        ));
        assert!(matches!(
            IntoApiResponse::into_response(client, "400-001"),
            Err(ApiError::ClientError(m)) if m == "Invalid upload request"
        ));
        assert!(matches!(
            api_error("599-999"),
            ApiError::ServerError(m) if m == FALLBACK_MESSAGE
        ));
    }

    #[tokio::test]
    async fn test_api_error_renders_json() {
        let response =
            ApiError::ForbiddenError("Forbidden".into()).into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Forbidden"}"#);
    }
}
