use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Posts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Posts::Title).string().not_null())
                    .col(ColumnDef::new(Posts::ImageUrl).string().not_null())
                    .col(ColumnDef::new(Posts::InstagramUrl).string().not_null())
                    .col(ColumnDef::new(Posts::ShopUrl).string())
                    .col(ColumnDef::new(Posts::ReserveUrl).string())
                    .col(ColumnDef::new(Posts::Prefecture).string().not_null())
                    .col(
                        ColumnDef::new(Posts::PostType)
                            .string()
                            .not_null()
                            .check(
                                Expr::col(Posts::PostType)
                                    .is_in(["food", "tourist_spot"]),
                            ),
                    )
                    .col(ColumnDef::new(Posts::Address).string())
                    .col(
                        ColumnDef::new(Posts::Tags)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(
                        ColumnDef::new(Posts::Parking)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Posts::PriceRange).string())
                    .col(
                        ColumnDef::new(Posts::EntranceFee)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Posts::PostedAt).date_time().not_null())
                    .col(
                        ColumnDef::new(Posts::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Posts {
    Table,
    Id,
    Title,
    ImageUrl,
    InstagramUrl,
    ShopUrl,
    ReserveUrl,
    Prefecture,
    PostType,
    Address,
    Tags,
    Parking,
    PriceRange,
    EntranceFee,
    PostedAt,
    CreatedAt,
}
