use sea_orm_migration::prelude::*;

use crate::m20260105_101522_create_posts_table::Posts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Posts::Table)
                    .name("idx_posts_prefecture_posted_at")
                    .col(Posts::Prefecture)
                    .col(Posts::PostedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Posts::Table)
                    .name("idx_posts_created_at")
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .table(Posts::Table)
                    .name("idx_posts_created_at")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .table(Posts::Table)
                    .name("idx_posts_prefecture_posted_at")
                    .to_owned(),
            )
            .await
    }
}
