use askama::Template;
use chrono::{DateTime, Utc};
use shared::utils::{blog_post_url, render_xml};
use sqlx::query_as;

use crate::filters;
use crate::types::PageGlobals;

#[derive(sqlx::FromRow)]
struct SitemapRow {
    slug: String,
    publish: DateTime<Utc>,
    updated: DateTime<Utc>,
}

struct SitemapEntry {
    url: String,
    updated: DateTime<Utc>,
}

#[derive(Template)]
#[template(path = "sitemap.xml")]
struct SitemapPage {
    entries: Vec<SitemapEntry>,
}

pub async fn render(globals: PageGlobals) -> anyhow::Result<cgi::Response> {
    let rows = query_as::<_, SitemapRow>(
        "SELECT slug, publish, updated FROM posts WHERE status = 'published' ORDER BY publish DESC",
    )
    .fetch_all(&globals.connection_pool)
    .await?;

    let entries = rows
        .into_iter()
        .map(|row| SitemapEntry {
            url: blog_post_url(&globals.settings.base_url, &row.publish, &row.slug),
            updated: row.updated,
        })
        .collect();

    render_xml("application/xml", SitemapPage { entries })
}
