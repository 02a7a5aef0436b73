use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait,
    IntoActiveModel,
};

use crate::active_models::{prelude::*, *};
use crate::post_query::{self, Dialect};
use entity::prelude::*;

#[derive(Clone, Debug)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<post::Model> for PostEntity {
    type Error = anyhow::Error;

    /// Fails on a `post_type` outside the known categories.
    fn try_from(value: post::Model) -> anyhow::Result<Self> {
        let post_type =
            PostType::from_str(&value.post_type).with_context(|| {
                format!(
                    "post {} has unknown post_type {:?}",
                    value.id, value.post_type
                )
            })?;

        Ok(Self {
            id: value.id,
            title: value.title,
            image_url: value.image_url,
            instagram_url: value.instagram_url,
            shop_url: value.shop_url,
            reserve_url: value.reserve_url,
            prefecture: value.prefecture,
            post_type,
            address: value.address,
            tags: value.tags,
            parking: value.parking,
            price_range: value.price_range,
            entrance_fee: value.entrance_fee,
            posted_at: value.posted_at.and_utc(),
            created_at: value.created_at.and_utc(),
        })
    }
}

/// Copies the writable columns of `draft` onto `model`.
fn apply_draft(model: &mut post::ActiveModel, draft: PostDraft) {
    model.title = ActiveValue::Set(draft.title);
    model.image_url = ActiveValue::Set(draft.image_url);
    model.instagram_url = ActiveValue::Set(draft.instagram_url);
    model.shop_url = ActiveValue::Set(draft.shop_url);
    model.reserve_url = ActiveValue::Set(draft.reserve_url);
    model.prefecture = ActiveValue::Set(draft.prefecture);
    model.post_type = ActiveValue::Set(draft.post_type.to_string());
    model.address = ActiveValue::Set(draft.address);
    model.tags = ActiveValue::Set(draft.tags);
    model.parking = ActiveValue::Set(draft.parking);
    model.price_range = ActiveValue::Set(draft.price_range);
    model.entrance_fee = ActiveValue::Set(draft.entrance_fee);
}

impl PostRepository {
    pub async fn find(
        &self,
        filter: &PostFilter,
        dialect: Dialect,
    ) -> anyhow::Result<Vec<PostEntity>> {
        let posts = Post::find()
            .from_raw_sql(post_query::statement(filter, dialect))
            .all(self.db.as_ref())
            .await?;

        posts.into_iter().map(PostEntity::try_from).collect()
    }

    pub async fn create(&self, draft: PostDraft) -> anyhow::Result<PostEntity> {
        let now = Utc::now().naive_utc();
        let posted_at = draft.posted_at.map(|t| t.naive_utc()).unwrap_or(now);

        let mut model = post::ActiveModel {
            posted_at: ActiveValue::Set(posted_at),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        };
        apply_draft(&mut model, draft);

        let post = model.insert(self.db.as_ref()).await?;
        tracing::info!(post_id = post.id, "created post");

        PostEntity::try_from(post)
    }

    /// Overwrites the writable columns of post `id`. `Ok(None)` when no such
    /// post exists.
    pub async fn update(
        &self,
        id: i32,
        draft: PostDraft,
    ) -> anyhow::Result<Option<PostEntity>> {
        let Some(post) = Post::find_by_id(id).one(self.db.as_ref()).await? else {
            return Ok(None);
        };

        let mut model = post.into_active_model();
        apply_draft(&mut model, draft);

        let post = model.update(self.db.as_ref()).await?;
        tracing::info!(post_id = post.id, "updated post");

        PostEntity::try_from(post).map(Some)
    }
}
