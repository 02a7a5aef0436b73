use chrono::{DateTime, Utc};
use entity::post::normalize_tags;
use entity::post_filter::{non_empty, parse_flag};
use entity::prelude::*;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetPostsParam {
    pub prefecture: Option<String>,
    /// `food` or `tourist_spot`
    pub category: Option<String>,
    /// Substring of the address
    pub address: Option<String>,
    /// `true` or `false`
    pub parking: Option<String>,
    pub price_range: Option<String>,
    /// `true` or `false`
    pub entrance_fee: Option<String>,
    pub tag: Option<String>,
    /// Substring of the title or of any tag
    pub search: Option<String>,
}

impl From<GetPostsParam> for PostFilter {
    fn from(value: GetPostsParam) -> Self {
        Self {
            prefecture: non_empty(value.prefecture),
            category: non_empty(value.category),
            address: non_empty(value.address),
            parking: parse_flag(value.parking.as_deref()),
            price_range: non_empty(value.price_range),
            entrance_fee: parse_flag(value.entrance_fee.as_deref()),
            tag: non_empty(value.tag),
            search: non_empty(value.search),
        }
    }
}

/// Body of `POST /api/posts` and `PUT /api/posts/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PostRequest {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub instagram_url: Option<String>,
    pub shop_url: Option<String>,
    pub reserve_url: Option<String>,
    /// Prefecture slug such as `tokyo`
    pub prefecture: Option<String>,
    /// `food` or `tourist_spot`
    pub category: Option<String>,
    pub address: Option<String>,
    pub tags: Option<Vec<String>>,
    pub parking: Option<bool>,
    pub price_range: Option<String>,
    pub entrance_fee: Option<bool>,
    /// RFC 3339; defaults to now. Ignored on update.
    #[schema(value_type = Option<String>)]
    pub posted_at: Option<DateTime<Utc>>,
}

fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn optional(value: Option<String>) -> Option<String> {
    required(&value)
}

impl PostRequest {
    /// Validates the body. The error is the message returned with 400.
    pub fn into_draft(self) -> Result<PostDraft, String> {
        let fields = [
            ("title", required(&self.title)),
            ("image_url", required(&self.image_url)),
            ("instagram_url", required(&self.instagram_url)),
            ("prefecture", required(&self.prefecture)),
            ("category", required(&self.category)),
        ];
        let missing: Vec<_> = fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(format!(
                "Missing required fields: {}",
                missing.join(", ")
            ));
        }

        let [title, image_url, instagram_url, prefecture, category] =
            fields.map(|(_, value)| value.unwrap_or_default());

        let post_type = category.parse::<PostType>().map_err(|_| {
            format!(
                "Invalid category: {category} (expected food or tourist_spot)"
            )
        })?;
        let prefecture = Prefecture::find_by_slug(&prefecture.to_lowercase())
            .ok_or_else(|| format!("Unknown prefecture: {prefecture}"))?;

        Ok(PostDraft {
            title,
            image_url,
            instagram_url,
            shop_url: optional(self.shop_url),
            reserve_url: optional(self.reserve_url),
            prefecture: prefecture.slug.to_string(),
            post_type,
            address: optional(self.address),
            tags: normalize_tags(self.tags.unwrap_or_default()),
            parking: self.parking.unwrap_or_default(),
            price_range: optional(self.price_range),
            entrance_fee: self.entrance_fee.unwrap_or_default(),
            posted_at: self.posted_at,
        })
    }
}
