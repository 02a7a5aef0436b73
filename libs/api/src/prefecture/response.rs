use entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct PrefectureResp {
    /// JIS X 0401 code
    pub code: u8,
    pub slug: String,
    pub name: String,
    pub region: String,
}

impl From<&Prefecture> for PrefectureResp {
    fn from(prefecture: &Prefecture) -> Self {
        Self {
            code: prefecture.code,
            slug: prefecture.slug.to_string(),
            name: prefecture.name.to_string(),
            region: prefecture.region.to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct GetPrefecturesResp {
    pub prefectures: Vec<PrefectureResp>,
}

#[derive(Serialize, ToSchema)]
pub struct GetPrefectureResp {
    pub prefecture: PrefectureResp,
}
