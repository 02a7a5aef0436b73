use std::net::{Ipv4Addr, SocketAddr};

use api::{serve, Config};
use repository::init_repository;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let secrets = util::load_env("Secrets.dev.toml")?;

    let repository =
        init_repository(&secrets.require("LOCAL_DATABASE_URL")?).await?;
    let config = Config::from_lookup(|key| secrets.get(key))?;

    let router = serve(repository, config).await?;

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8000));
    let listener = TcpListener::bind(&address).await?;
    info!(%address, "listening");

    Ok(axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?)
}
