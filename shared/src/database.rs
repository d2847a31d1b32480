use sqlx::PgPool;

use crate::config::DatabaseConfig;

pub async fn connect_db(config: &DatabaseConfig) -> anyhow::Result<PgPool, sqlx::Error> {
    PgPool::connect(&config.connection_string()).await
}
