use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::header,
    Json,
};
use entity::prelude::*;
use repository::Dialect;

pub mod request;
pub mod response;

use crate::post::response::PostResp;
use crate::response::{ApiResponse, IntoApiResponse};
use crate::{ApiError, ApiState};

use self::{
    request::{RecordClickRequest, SearchPostsParam},
    response::{RecordClickResp, SearchPostsResp},
};

const NO_STORE: [(header::HeaderName, &str); 1] =
    [(header::CACHE_CONTROL, "no-store, max-age=0")];

/// Quick search over post titles, newest first
#[utoipa::path(
    get,
    path = "/api/click",
    responses(
        (status = 200, description = "Matching posts", body = SearchPostsResp)
    ),
    params(
        SearchPostsParam
    )
)]
pub async fn search_posts(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<SearchPostsParam>,
) -> ApiResponse<([(header::HeaderName, &'static str); 1], Json<SearchPostsResp>)>
{
    let filter = PostFilter::from(params);

    let posts = state
        .repo
        .post
        .find(&filter, Dialect::Quick)
        .await
        .into_response("500-004")?;

    Ok((
        NO_STORE,
        Json(SearchPostsResp {
            posts: posts.into_iter().map(PostResp::from).collect(),
        }),
    ))
}

/// Record a click-through on a post
#[utoipa::path(
    post,
    path = "/api/click",
    request_body = RecordClickRequest,
    responses(
        (status = 200, description = "Click recorded", body = RecordClickResp),
        (status = 400, description = "Missing or invalid postId"),
        (status = 404, description = "Post not found"),
    )
)]
pub async fn record_click(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<RecordClickRequest>, JsonRejection>,
) -> ApiResponse<Json<RecordClickResp>> {
    let Json(RecordClickRequest { post_id }) =
        body.map_err(|rejection| ApiError::ClientError(rejection.body_text()))?;

    let click = state
        .repo
        .post_click
        .record(post_id)
        .await
        .into_response("500-005")?;
    if click.is_none() {
        return Err(ApiError::NotFoundError("Post not found".to_string()));
    }

    let clicks = state
        .repo
        .post_click
        .count_by_post(post_id)
        .await
        .into_response("500-005")?;

    Ok(Json(RecordClickResp { post_id, clicks }))
}
