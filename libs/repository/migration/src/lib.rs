pub use sea_orm_migration::prelude::*;

mod m20260105_101522_create_posts_table;
mod m20260105_103047_create_index_at_posts;
mod m20260212_090311_create_post_clicks_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_101522_create_posts_table::Migration),
            Box::new(m20260105_103047_create_index_at_posts::Migration),
            Box::new(m20260212_090311_create_post_clicks_table::Migration),
        ]
    }
}
