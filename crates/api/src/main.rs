use anyhow::Context;

use wms_api::app::{self, services::AppServices};
use wms_infra::config::{AppConfig, StorageConfig};
use wms_infra::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wms_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    if std::env::args().nth(1).as_deref() == Some("migrate") {
        let StorageConfig::Postgres(database) = &config.storage else {
            anyhow::bail!("migrate requires USE_PERSISTENT_STORES=true and DATABASE_URL");
        };
        let pool = db::connect(database).await.context("failed to connect to database")?;
        db::migrate(&pool).await.context("failed to apply migrations")?;
        return Ok(());
    }

    let services = AppServices::from_config(&config.storage)
        .await
        .context("failed to build services")?;
    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
