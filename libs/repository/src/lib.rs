use std::sync::Arc;

use migration::Migrator;
use migration::MigratorTrait;
use post::PostRepository;
use post_click::PostClickRepository;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

mod active_models;
pub mod post;
pub mod post_click;
pub mod post_query;

pub use post_query::Dialect;

#[derive(Clone, Debug)]
pub struct Repository {
    pub post: PostRepository,
    pub post_click: PostClickRepository,
    db: Arc<DatabaseConnection>,
}

impl Repository {
    pub fn new(db: DatabaseConnection) -> Self {
        let db = Arc::new(db);

        Self {
            post: PostRepository::new(db.clone()),
            post_click: PostClickRepository::new(db.clone()),
            db,
        }
    }

    /// Checks that the database still answers.
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.db.ping().await?;

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(
        "in sea-orm crate from unsuccessful database operations: {}: {}",
        message,
        source
    )]
    InSeaOrmDbErr {
        message: String,
        source: sea_orm::DbErr,
    },
}

type Response<T> = Result<T, RepositoryError>;

pub trait IntoResponse<T> {
    fn into_response(self, message: &str) -> Response<T>;
}

impl<T> IntoResponse<T> for Result<T, sea_orm::DbErr> {
    fn into_response(self, message: &str) -> Response<T> {
        self.map_err(|e| RepositoryError::InSeaOrmDbErr {
            message: message.to_string(),
            source: e,
        })
    }
}

/// Connects to Postgres, applies pending migrations and wires up the
/// repositories.
pub async fn init_repository(db_url: &str) -> Response<Repository> {
    let db = init_db(db_url).await?;

    Ok(Repository::new(db))
}

async fn init_db(db_url: &str) -> Response<DatabaseConnection> {
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(5)
        .min_connections(1)
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt)
        .await
        .into_response("in database connect")?;

    Migrator::up(&db, None)
        .await
        .into_response("in migrator up")?;

    Ok(db)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_db_err_is_wrapped_with_context() {
        let result: Result<(), sea_orm::DbErr> =
            Err(sea_orm::DbErr::Custom("boom".into()));

        let err = result.into_response("in migrator up").unwrap_err();

        assert_eq!(
            err.to_string(),
            "in sea-orm crate from unsuccessful database operations: \
             in migrator up: Custom Error: boom"
        );
    }

    #[tokio::test]
    async fn test_repositories_share_one_connection() {
        let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
            .into_connection();

        let repository = Repository::new(db);
        assert_eq!(Arc::strong_count(&repository.db), 3);

        let cloned = repository.clone();
        assert!(cloned.ping().await.is_ok());
    }
}
