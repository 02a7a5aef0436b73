use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use tracing::info;

pub mod request;
pub mod response;

use crate::clients::upload::UploadSource;
use crate::response::{api_error, ApiResponse, IntoApiResponse};
use crate::ApiState;

use self::{request::UploadRequest, response::UploadResp};

/// Body limit of `POST /api/upload`; phone photos exceed axum's 2 MB default.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

fn source_from(headers: &HeaderMap, body: Bytes) -> ApiResponse<UploadSource> {
    if body.is_empty() {
        return Err(api_error("400-001"));
    }
    if !is_json(headers) {
        return Ok(UploadSource::Bytes(body));
    }

    let request: UploadRequest =
        serde_json::from_slice(&body).map_err(|_| api_error("400-001"))?;
    if request.is_empty() {
        return Err(api_error("400-001"));
    }

    Ok(UploadSource::Json {
        base64: request.base64,
        url: request.url,
    })
}

/// Store an image and return its public URL
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(
        content = UploadRequest,
        description = "JSON reference, or the raw image as application/octet-stream",
    ),
    responses(
        (status = 200, description = "Stored image", body = UploadResp),
        (status = 400, description = "Nothing to upload"),
        (status = 401, description = "No valid session"),
        (status = 403, description = "Not an admin"),
    )
)]
pub async fn upload_image(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResponse<Json<UploadResp>> {
    let source = source_from(&headers, body)?;

    let Some(client) = &state.upload else {
        return Err(api_error("500-007"));
    };

    let uploaded = client.upload(source).await.into_response("500-006")?;
    info!(url = %uploaded.url, "image uploaded");

    Ok(Json(UploadResp {
        url: uploaded.url,
        mime_type: uploaded.mime_type,
    }))
}
