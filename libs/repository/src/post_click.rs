use std::sync::Arc;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait,
    PaginatorTrait,
};
use sea_orm::{ColumnTrait, QueryFilter};

use crate::active_models::{prelude::*, *};
use entity::prelude::*;

#[derive(Clone, Debug)]
pub struct PostClickRepository {
    db: Arc<DatabaseConnection>,
}

impl PostClickRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<post_click::Model> for PostClickEntity {
    fn from(value: post_click::Model) -> Self {
        PostClickEntity {
            id: value.id,
            post_id: value.post_id,
            clicked_at: value.clicked_at,
        }
    }
}

impl PostClickRepository {
    /// Records one click-through on `post_id`. `Ok(None)` when the post does
    /// not exist.
    pub async fn record(
        &self,
        post_id: i32,
    ) -> anyhow::Result<Option<PostClickEntity>> {
        if Post::find_by_id(post_id).one(self.db.as_ref()).await?.is_none() {
            return Ok(None);
        }

        let click = post_click::ActiveModel {
            id: ActiveValue::not_set(),
            post_id: ActiveValue::Set(post_id),
            clicked_at: ActiveValue::Set(Utc::now().naive_utc()),
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(Some(PostClickEntity::from(click)))
    }

    pub async fn count_by_post(&self, post_id: i32) -> anyhow::Result<u64> {
        let count = PostClick::find()
            .filter(post_click::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod test {
    use chrono::NaiveDateTime;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    #[tokio::test]
    async fn test_record_unknown_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        let repo = PostClickRepository::new(Arc::new(db));

        assert!(repo.record(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_inserts_click() {
        let post = post::Model {
            id: 3,
            title: "一蘭 渋谷店".into(),
            image_url: "https://img.example/ichiran.jpg".into(),
            instagram_url: "https://instagram.com/p/xyz".into(),
            shop_url: None,
            reserve_url: None,
            prefecture: "tokyo".into(),
            post_type: "food".into(),
            address: None,
            tags: vec![],
            parking: false,
            price_range: None,
            entrance_fee: false,
            posted_at: NaiveDateTime::default(),
            created_at: NaiveDateTime::default(),
        };
        let click = post_click::Model {
            id: 1,
            post_id: 3,
            clicked_at: NaiveDateTime::default(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post]])
            .append_query_results([vec![click]])
            .into_connection();
        let repo = PostClickRepository::new(Arc::new(db));

        let click = repo.record(3).await.unwrap().unwrap();

        assert_eq!(click.id, 1);
        assert_eq!(click.post_id, 3);
    }
}
