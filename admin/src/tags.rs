use askama::Template;
use serde::Deserialize;
use shared::utils::{post_body, render_html, slugify};

use crate::common::{get_common, Common};
use crate::types::{AdminMenuPages, PageGlobals};

#[derive(Deserialize)]
struct DeleteTag {
    delete: i32,
}

#[derive(Deserialize)]
struct NewTag {
    new: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagRequest {
    Delete(DeleteTag),
    Create(NewTag),
}

#[derive(sqlx::FromRow)]
struct TagRow {
    id: i32,
    name: String,
    slug: String,
    post_count: i64,
}

#[derive(Template)]
#[template(path = "tags.html")]
struct TagPage {
    common: Common,
    tags: Vec<TagRow>,
}

pub async fn render(request: &cgi::Request, globals: PageGlobals) -> anyhow::Result<cgi::Response> {
    if request.method() == "POST" {
        let tag_request: TagRequest = post_body(request)?;
        match tag_request {
            TagRequest::Delete(to_delete) => {
                sqlx::query("DELETE FROM tags WHERE id = $1")
                    .bind(to_delete.delete)
                    .execute(&globals.connection_pool)
                    .await?;
            }
            TagRequest::Create(new_tag) => {
                let name = new_tag.new.trim();
                if !name.is_empty() {
                    sqlx::query(
                        "INSERT INTO tags (name, slug) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                    )
                    .bind(name)
                    .bind(slugify(name))
                    .execute(&globals.connection_pool)
                    .await?;
                }
            }
        }
    }

    let tags = sqlx::query_as::<_, TagRow>(
        "SELECT tags.id AS id, tags.name, tags.slug,
    (SELECT COUNT(*) FROM post_tags WHERE post_tags.tag_id = tags.id) AS post_count
FROM tags
ORDER BY name",
    )
    .fetch_all(&globals.connection_pool)
    .await?;

    let common = get_common(&globals, AdminMenuPages::Tags).await?;
    render_html(TagPage { common, tags })
}
