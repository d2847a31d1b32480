use askama::Template;
use chrono::{DateTime, Utc};
use shared::types::Post;
use shared::utils::render_html;

use crate::common::{get_common, Common};
use crate::filters;
use crate::types::{AdminMenuPages, PageGlobals};

#[derive(sqlx::FromRow)]
struct DashboardComment {
    post_title: String,
    name: String,
    body: String,
    created: DateTime<Utc>,
    active: bool,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct Dashboard {
    common: Common,
    posts: Vec<Post>,
    comments: Vec<DashboardComment>,
}

pub async fn render(globals: PageGlobals) -> anyhow::Result<cgi::Response> {
    let posts = sqlx::query_as::<_, Post>(
        "SELECT id, author_id, title, slug, body, publish, created, updated, status
FROM posts
ORDER BY updated DESC
FETCH FIRST 10 ROWS ONLY",
    )
    .fetch_all(&globals.connection_pool)
    .await?;

    let comments = sqlx::query_as::<_, DashboardComment>(
        "SELECT posts.title AS post_title, comments.name, comments.body, comments.created, comments.active
FROM comments
INNER JOIN posts ON posts.id = comments.post_id
ORDER BY comments.created DESC
FETCH FIRST 5 ROWS ONLY",
    )
    .fetch_all(&globals.connection_pool)
    .await?;

    let common = get_common(&globals, AdminMenuPages::Dashboard).await?;
    render_html(Dashboard {
        common,
        posts,
        comments,
    })
}
