use sea_orm_migration::prelude::*;

use crate::m20260105_101522_create_posts_table::Posts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostClicks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostClicks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostClicks::PostId).integer().not_null())
                    .col(
                        ColumnDef::new(PostClicks::ClickedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_clicks_post_id")
                            .from(PostClicks::Table, PostClicks::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostClicks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PostClicks {
    Table,
    Id,
    PostId,
    ClickedAt,
}
