use serde::Serialize;
use utoipa::ToSchema;

use crate::post::response::PostResp;

#[derive(Serialize, ToSchema)]
pub struct SearchPostsResp {
    pub posts: Vec<PostResp>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordClickResp {
    pub post_id: i32,
    /// Clicks recorded for the post so far
    pub clicks: u64,
}
