use api::Config;
use repository::init_repository;
use shuttle_runtime::{Error, SecretStore, Secrets};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[shuttle_runtime::main]
async fn main(
    #[Secrets] secret_store: SecretStore,
    #[shuttle_shared_db::Postgres(local_uri = "{secrets.LOCAL_DATABASE_URL}")]
    conn_string: String,
) -> shuttle_axum::ShuttleAxum {
    // shuttle may already have installed a subscriber when running locally
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let config = Config::from_lookup(|key| secret_store.get(key))
        .map_err(|e| Error::BuildPanic(e.to_string()))?;
    info!(app_origin = %config.app_origin, "configuration loaded");

    let repository = init_repository(&conn_string)
        .await
        .map_err(|e| Error::BuildPanic(e.to_string()))?;

    let router = api::serve(repository, config)
        .await
        .map_err(|e| Error::BuildPanic(e.to_string()))?;

    Ok(router.into())
}
