use std::collections::HashMap;

use async_std::task;
use shared::{config, database, settings, utils};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::types::PageGlobals;

mod comment;
mod common;
mod detail;
mod feed;
mod filters;
mod list;
mod mail;
mod response;
mod search;
mod share;
mod sitemap;
mod types;

async fn process(request: &cgi::Request, query_string: &str) -> anyhow::Result<cgi::Response> {
    let query: HashMap<String, String> = utils::parse_query_string(query_string)?;
    let config = config::load_config()?;
    let connection_pool = database::connect_db(&config.database).await?;
    let settings = settings::get_settings_struct(&connection_pool).await?;
    let globals = PageGlobals {
        query,
        connection_pool,
        settings,
        config,
    };

    let action = globals
        .query
        .get("action")
        .map(String::as_str)
        .unwrap_or("list");
    info!(action, "serving request");

    match action {
        "list" => list::render(globals).await,
        "post" => detail::render(globals).await,
        "comment" => comment::render(request, globals).await,
        "share" => share::render(request, globals).await,
        "search" => search::render(globals).await,
        "feed" => feed::render(globals).await,
        "sitemap" => sitemap::render(globals).await,
        _ => response::bad_request(),
    }
}

cgi::cgi_try_main! {|request: cgi::Request| -> anyhow::Result<cgi::Response> {
    // CGI stdout is the response body, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let query_string = request.uri().query().unwrap_or("");
    task::block_on(process(&request, query_string))
}}
