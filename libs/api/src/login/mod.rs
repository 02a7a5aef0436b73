use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use handshake::{document, AuthMessage, AuthUser};
use serde_json::json;
use tracing::info;

pub mod response;

use crate::auth::{authenticate, Claims};
use crate::ApiState;

use self::response::{StatusResp, TokenResp, UserResp};

const NO_STORE: &str = "no-store, max-age=0";

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}

/// Page loaded in the login popup once sign-in finishes. It hands the
/// session token to the opener window with `postMessage`.
#[utoipa::path(
    get,
    path = "/api/auth/expo-web-success",
    responses(
        (status = 200, description = "Page posting AUTH_SUCCESS", content_type = "text/html"),
        (status = 401, description = "Page posting AUTH_ERROR", content_type = "text/html"),
    )
)]
pub async fn expo_web_success(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Response {
    let (status, message) = match authenticate(&state.config.auth, &headers) {
        Some(session) => {
            info!(sub = ?session.claims.sub, "handing session to opener");
            (
                StatusCode::OK,
                AuthMessage::success(session.raw, session.claims.into()),
            )
        }
        None => (StatusCode::UNAUTHORIZED, AuthMessage::unauthorized()),
    };

    let page = document::render(&message, &state.config.app_origin);

    (status, [(header::CACHE_CONTROL, "no-store")], Html(page)).into_response()
}

/// Current session token, for clients that cannot read the cookie
#[utoipa::path(
    get,
    path = "/api/auth/token",
    responses(
        (status = 200, description = "Session token", body = TokenResp),
        (status = 401, description = "No valid session"),
    )
)]
pub async fn get_token(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Response {
    let headers_out = [(header::CACHE_CONTROL, NO_STORE)];

    match authenticate(&state.config.auth, &headers) {
        Some(session) => (
            headers_out,
            Json(TokenResp {
                jwt: session.raw,
                user: UserResp::from(session.claims),
            }),
        )
            .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            headers_out,
            Json(json!({ "error": "Unauthorized" })),
        )
            .into_response(),
    }
}

/// Whether the caller is signed in, and as an admin
#[utoipa::path(
    get,
    path = "/api/auth/status",
    responses(
        (status = 200, description = "Signed in", body = StatusResp),
        (status = 401, description = "Not signed in", body = StatusResp),
    )
)]
pub async fn get_status(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Response {
    let no_cache = [
        (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
        (header::PRAGMA, "no-cache"),
        (header::EXPIRES, "0"),
    ];

    let Some(session) = authenticate(&state.config.auth, &headers) else {
        let body = StatusResp {
            authenticated: false,
            is_admin: false,
            user: None,
        };
        return (StatusCode::UNAUTHORIZED, no_cache, Json(body)).into_response();
    };

    let is_admin = state.config.auth.is_admin(session.claims.email.as_deref());
    let body = StatusResp {
        authenticated: true,
        is_admin,
        user: Some(UserResp::from(session.claims)),
    };

    (no_cache, Json(body)).into_response()
}
