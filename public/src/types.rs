use std::collections::HashMap;

use shared::{config::Config, settings::Settings};
use sqlx::PgPool;

/// Everything a handler needs for one request: the parsed query string,
/// the connection pool, the site settings and the process config.
pub struct PageGlobals {
    pub query: HashMap<String, String>,
    pub connection_pool: PgPool,
    pub settings: Settings,
    pub config: Config,
}
