use entity::post_filter::{non_empty, parse_flag};
use entity::prelude::*;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use utoipa::{IntoParams, ToSchema};

/// Quick-search parameters. Same filters as the listing, but the flags are
/// spelled `has_*`.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchPostsParam {
    pub prefecture: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub has_parking: Option<String>,
    pub price_range: Option<String>,
    pub has_entrance_fee: Option<String>,
    pub tag: Option<String>,
    /// Substring of the title
    pub search: Option<String>,
}

impl From<SearchPostsParam> for PostFilter {
    fn from(value: SearchPostsParam) -> Self {
        Self {
            prefecture: non_empty(value.prefecture),
            category: non_empty(value.category),
            address: non_empty(value.address),
            parking: parse_flag(value.has_parking.as_deref()),
            price_range: non_empty(value.price_range),
            entrance_fee: parse_flag(value.has_entrance_fee.as_deref()),
            tag: non_empty(value.tag),
            search: non_empty(value.search),
        }
    }
}

#[serde_as]
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordClickRequest {
    /// A number or a numeric string
    #[serde(rename = "postId")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[schema(value_type = i32)]
    pub post_id: i32,
}
