use entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct PostResp {
    pub id: i32,
    pub title: String,
    pub image_url: String,
    pub instagram_url: String,
    pub shop_url: Option<String>,
    pub reserve_url: Option<String>,
    pub prefecture: String,
    /// `food` or `tourist_spot`
    #[schema(value_type = String)]
    pub post_type: PostType,
    pub address: Option<String>,
    pub tags: Vec<String>,
    pub parking: bool,
    pub price_range: Option<String>,
    pub entrance_fee: bool,
    /// RFC 3339
    pub posted_at: String,
    /// RFC 3339
    pub created_at: String,
}

impl From<PostEntity> for PostResp {
    fn from(post: PostEntity) -> Self {
        Self {
            id: post.id,
            title: post.title,
            image_url: post.image_url,
            instagram_url: post.instagram_url,
            shop_url: post.shop_url,
            reserve_url: post.reserve_url,
            prefecture: post.prefecture,
            post_type: post.post_type,
            address: post.address,
            tags: post.tags,
            parking: post.parking,
            price_range: post.price_range,
            entrance_fee: post.entrance_fee,
            posted_at: post.posted_at.to_rfc3339(),
            created_at: post.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct GetPostsResp {
    pub posts: Vec<PostResp>,
    /// Distinct tags of `posts`, in first-seen order
    pub tags: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PostResponse {
    pub post: PostResp,
}
