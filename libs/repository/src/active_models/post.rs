use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub image_url: String,
    pub instagram_url: String,
    pub shop_url: Option<String>,
    pub reserve_url: Option<String>,
    pub prefecture: String,
    pub post_type: String,
    pub address: Option<String>,
    pub tags: Vec<String>,
    pub parking: bool,
    pub price_range: Option<String>,
    pub entrance_fee: bool,
    pub posted_at: DateTime,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post_click::Entity")]
    PostClick,
}

impl Related<super::post_click::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostClick.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
