use askama::Template;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::utils::{post_body, render_html, render_redirect};

use crate::common::{get_common, Common};
use crate::filters;
use crate::types::{AdminMenuPages, PageGlobals};

#[derive(sqlx::FromRow)]
struct CommentListItem {
    id: i32,
    post_title: String,
    name: String,
    email: String,
    body: String,
    created: DateTime<Utc>,
    active: bool,
}

#[derive(Deserialize)]
struct ModerationRequest {
    comment: i32,
    moderate: String,
}

#[derive(Template)]
#[template(path = "comment_list.html")]
struct CommentList {
    common: Common,
    comments: Vec<CommentListItem>,
}

pub async fn comment_list(globals: PageGlobals) -> anyhow::Result<cgi::Response> {
    let comments = sqlx::query_as::<_, CommentListItem>(
        "SELECT comments.id AS id, posts.title AS post_title, comments.name, comments.email,
    comments.body, comments.created, comments.active
FROM comments
INNER JOIN posts ON posts.id = comments.post_id
ORDER BY comments.created DESC",
    )
    .fetch_all(&globals.connection_pool)
    .await?;

    let common = get_common(&globals, AdminMenuPages::Comments).await?;
    render_html(CommentList { common, comments })
}

pub async fn moderate_comment(
    request: &cgi::Request,
    globals: PageGlobals,
) -> anyhow::Result<cgi::Response> {
    let moderation: ModerationRequest = post_body(request)?;
    let active = moderation.moderate == "show";

    sqlx::query("UPDATE comments SET active = $1, updated = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(active)
        .bind(moderation.comment)
        .execute(&globals.connection_pool)
        .await?;

    render_redirect("comments")
}
