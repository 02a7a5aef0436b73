use axum::{
    extract::{Path, Query},
    Json,
};
use entity::prelude::*;
use serde::Deserialize;
use utoipa::IntoParams;

pub mod response;

use crate::response::ApiResponse;
use crate::ApiError;

use self::response::{GetPrefectureResp, GetPrefecturesResp, PrefectureResp};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetPrefecturesParam {
    /// Substring of the Japanese name or the slug
    pub q: Option<String>,
}

/// List prefectures, optionally narrowed by a search term
#[utoipa::path(
    get,
    path = "/api/prefectures",
    responses(
        (status = 200, description = "Matching prefectures in JIS order", body = GetPrefecturesResp)
    ),
    params(
        GetPrefecturesParam
    )
)]
pub async fn get_prefectures(
    Query(params): Query<GetPrefecturesParam>,
) -> Json<GetPrefecturesResp> {
    let query = params.q.unwrap_or_default();

    Json(GetPrefecturesResp {
        prefectures: Prefecture::search(query.trim())
            .into_iter()
            .map(PrefectureResp::from)
            .collect(),
    })
}

/// Look up one prefecture
#[utoipa::path(
    get,
    path = "/api/prefectures/{key}",
    responses(
        (status = 200, description = "The prefecture", body = GetPrefectureResp),
        (status = 404, description = "Unknown prefecture"),
    ),
    params(
        ("key", description = "slug such as `tokyo`, or JIS code such as `13`"),
    )
)]
pub async fn get_prefecture(
    Path(key): Path<String>,
) -> ApiResponse<Json<GetPrefectureResp>> {
    let Some(prefecture) = Prefecture::lookup(&key) else {
        return Err(ApiError::NotFoundError(format!(
            "Unknown prefecture: {key}"
        )));
    };

    Ok(Json(GetPrefectureResp {
        prefecture: PrefectureResp::from(prefecture),
    }))
}
