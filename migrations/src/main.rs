use async_std::task;
use sqlx::Connection;
use sqlx::postgres::PgConnection;
use tracing_subscriber::EnvFilter;

use shared::config::load_config;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    task::block_on(migrate())
}

async fn migrate() -> anyhow::Result<()> {
    let config = load_config()?;
    let mut connection = PgConnection::connect(&config.database.connection_string()).await?;
    sqlx::migrate!("../db/migrations").run(&mut connection).await?;
    tracing::info!("migrations applied");
    Ok(())
}
