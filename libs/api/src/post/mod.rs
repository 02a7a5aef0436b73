use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use entity::{post::distinct_tags, prelude::*};
use repository::Dialect;
use std::sync::Arc;
use tracing::info;

pub mod request;
pub mod response;

use crate::auth::Claims;
use crate::response::{ApiResponse, IntoApiResponse};
use crate::{ApiError, ApiState};

use self::{
    request::{GetPostsParam, PostRequest},
    response::{GetPostsResp, PostResp, PostResponse},
};

/// List posts, newest first
#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "List posts successfully", body = GetPostsResp)
    ),
    params(
        GetPostsParam
    )
)]
pub async fn get_posts(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<GetPostsParam>,
) -> ApiResponse<Json<GetPostsResp>> {
    let filter = PostFilter::from(params);

    let posts = state
        .repo
        .post
        .find(&filter, Dialect::Listing)
        .await
        .into_response("500-001")?;

    let tags = distinct_tags(&posts);
    let response = Json(GetPostsResp {
        posts: posts.into_iter().map(PostResp::from).collect(),
        tags,
    });

    Ok(response)
}

fn draft_from(
    body: Result<Json<PostRequest>, JsonRejection>,
) -> ApiResponse<PostDraft> {
    let Json(body) =
        body.map_err(|rejection| ApiError::ClientError(rejection.body_text()))?;

    body.into_draft().map_err(ApiError::ClientError)
}

/// Create a post
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = PostRequest,
    responses(
        (status = 200, description = "Created post", body = PostResponse),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "No valid session"),
        (status = 403, description = "Not an admin"),
    )
)]
pub async fn create_post(
    State(state): State<Arc<ApiState>>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<PostRequest>, JsonRejection>,
) -> ApiResponse<Json<PostResponse>> {
    let draft = draft_from(body)?;

    let post = state
        .repo
        .post
        .create(draft)
        .await
        .into_response("500-002")?;
    info!(post_id = post.id, by = ?claims.email, "post created");

    Ok(Json(PostResponse {
        post: PostResp::from(post),
    }))
}

/// Replace a post
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    request_body = PostRequest,
    responses(
        (status = 200, description = "Updated post", body = PostResponse),
        (status = 400, description = "Invalid id or body"),
        (status = 401, description = "No valid session"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Post not found"),
    ),
    params(
        ("id", description = "post id"),
    )
)]
pub async fn update_post(
    State(state): State<Arc<ApiState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    body: Result<Json<PostRequest>, JsonRejection>,
) -> ApiResponse<Json<PostResponse>> {
    let id: i32 = id
        .parse()
        .map_err(|_| ApiError::ClientError(format!("Invalid post id: {id}")))?;
    let draft = draft_from(body)?;

    let post = state
        .repo
        .post
        .update(id, draft)
        .await
        .into_response("500-003")?;

    let Some(post) = post else {
        return Err(ApiError::NotFoundError("Post not found".to_string()));
    };
    info!(post_id = post.id, by = ?claims.email, "post updated");

    Ok(Json(PostResponse {
        post: PostResp::from(post),
    }))
}
