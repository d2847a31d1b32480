use anyhow::anyhow;
use askama::Template;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use shared::errors::BlogError;
use shared::types::{Post, PostStatus, Tag};
use shared::utils::{post_body, render_html, render_redirect, slugify, BlogUtils};
use sqlx::PgPool;

use crate::common::{get_common, Common};
use crate::filters;
use crate::types::{AdminMenuPages, PageGlobals, PostRequest};

const ITEMS_PER_PAGE: i64 = 20;

struct TagOption {
    id: i32,
    name: String,
    selected: bool,
}

#[derive(Template)]
#[template(path = "manage_posts.html")]
struct ManagePosts {
    common: Common,
    posts: Vec<Post>,
    current_page: i64,
    page_count: i64,
}

#[derive(Template)]
#[template(path = "post_form.html")]
struct PostForm {
    common: Common,
    heading: &'static str,
    action: String,
    title: String,
    body: String,
    date: NaiveDate,
    status: PostStatus,
    tags: Vec<TagOption>,
    errors: Vec<BlogError>,
}

pub async fn manage_posts(globals: PageGlobals) -> anyhow::Result<cgi::Response> {
    let current_page: i64 = globals
        .query
        .get("page")
        .and_then(|page| page.parse().ok())
        .unwrap_or(0);

    let total_posts = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
        .fetch_one(&globals.connection_pool)
        .await?;
    let page_count = (total_posts as f64 / ITEMS_PER_PAGE as f64).ceil() as i64;

    let posts = sqlx::query_as::<_, Post>(
        "SELECT id, author_id, title, slug, body, publish, created, updated, status
FROM posts
ORDER BY publish DESC
OFFSET $1 ROWS FETCH NEXT $2 ROWS ONLY",
    )
    .bind(current_page * ITEMS_PER_PAGE)
    .bind(ITEMS_PER_PAGE)
    .fetch_all(&globals.connection_pool)
    .await?;

    let common = get_common(&globals, AdminMenuPages::Posts).await?;
    render_html(ManagePosts {
        common,
        posts,
        current_page,
        page_count,
    })
}

pub async fn new_post(
    request: &cgi::Request,
    globals: PageGlobals,
) -> anyhow::Result<cgi::Response> {
    if request.method() == "POST" {
        let post_request: PostRequest = post_body(request)?;
        save_new_post(globals, post_request).await
    } else {
        render_form(
            &globals,
            AdminMenuPages::NewPost,
            "New post",
            "?action=new-post".into(),
            blank_request(),
            Vec::new(),
        )
        .await
    }
}

pub async fn edit_post(
    request: &cgi::Request,
    globals: PageGlobals,
) -> anyhow::Result<cgi::Response> {
    let post_id: i32 = globals.query.get("id").parse_into()?;

    if request.method() == "POST" {
        let post_request: PostRequest = post_body(request)?;
        update_post(globals, post_id, post_request).await
    } else {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, author_id, title, slug, body, publish, created, updated, status
FROM posts
WHERE id = $1",
        )
        .bind(post_id)
        .fetch_one(&globals.connection_pool)
        .await?;
        let selected =
            sqlx::query_scalar::<_, i32>("SELECT tag_id FROM post_tags WHERE post_id = $1")
                .bind(post_id)
                .fetch_all(&globals.connection_pool)
                .await?;

        render_form(
            &globals,
            AdminMenuPages::Posts,
            "Edit post",
            format!("?action=edit_post&id={}", post_id),
            PostRequest {
                title: post.title,
                body: post.body,
                date: post.publish.date_naive(),
                status: post.status,
                tags: Some(selected),
            },
            Vec::new(),
        )
        .await
    }
}

async fn save_new_post(
    globals: PageGlobals,
    post_request: PostRequest,
) -> anyhow::Result<cgi::Response> {
    let slug = slugify(&post_request.title);
    let mut tx = globals.connection_pool.begin().await?;

    let inserted = sqlx::query_scalar::<_, i32>(
        "INSERT INTO posts (author_id, title, slug, body, publish, status)
VALUES ($1, $2, $3, $4, $5, $6)
RETURNING id",
    )
    .bind(globals.session.user_id)
    .bind(post_request.title.as_str())
    .bind(slug.as_str())
    .bind(post_request.body.as_str())
    .bind(publish_moment(post_request.date))
    .bind(post_request.status)
    .fetch_one(&mut tx)
    .await;

    match inserted {
        Ok(post_id) => {
            replace_tags(&mut tx, post_id, &post_request.tags).await?;
            tx.commit().await?;
            render_redirect("posts")
        }
        Err(error) if is_slug_collision(&error) => {
            tx.rollback().await?;
            render_form(
                &globals,
                AdminMenuPages::NewPost,
                "New post",
                "?action=new-post".into(),
                post_request,
                vec![BlogError::input(
                    "form",
                    "A post with the same slug already exists on that day",
                )],
            )
            .await
        }
        Err(error) => Err(error.into()),
    }
}

async fn update_post(
    globals: PageGlobals,
    post_id: i32,
    post_request: PostRequest,
) -> anyhow::Result<cgi::Response> {
    let mut tx = globals.connection_pool.begin().await?;

    // The slug never changes after creation, so moving the post to a
    // different day is the only way to hit the per-day unique index.
    let updated = sqlx::query(
        "UPDATE posts
SET title = $1, body = $2, status = $3,
    publish = CASE WHEN utc_day(publish) = $4 THEN publish ELSE $5 END,
    updated = CURRENT_TIMESTAMP
WHERE id = $6",
    )
    .bind(post_request.title.as_str())
    .bind(post_request.body.as_str())
    .bind(post_request.status)
    .bind(post_request.date)
    .bind(publish_moment(post_request.date))
    .bind(post_id)
    .execute(&mut tx)
    .await;

    match updated {
        Ok(done) if done.rows_affected() == 1 => {
            replace_tags(&mut tx, post_id, &post_request.tags).await?;
            tx.commit().await?;
            render_redirect("posts")
        }
        Ok(_) => {
            tx.rollback().await?;
            Err(anyhow!("Post {} not found", post_id))
        }
        Err(error) if is_slug_collision(&error) => {
            tx.rollback().await?;
            render_form(
                &globals,
                AdminMenuPages::Posts,
                "Edit post",
                format!("?action=edit_post&id={}", post_id),
                post_request,
                vec![BlogError::input(
                    "form",
                    "A post with the same slug already exists on that day",
                )],
            )
            .await
        }
        Err(error) => Err(error.into()),
    }
}

async fn render_form(
    globals: &PageGlobals,
    menu: AdminMenuPages,
    heading: &'static str,
    action: String,
    post_request: PostRequest,
    errors: Vec<BlogError>,
) -> anyhow::Result<cgi::Response> {
    let selected = post_request.tags.clone().unwrap_or_default();
    let tags = tag_options(&globals.connection_pool, &selected).await?;
    let common = get_common(globals, menu).await?;
    render_html(PostForm {
        common,
        heading,
        action,
        title: post_request.title,
        body: post_request.body,
        date: post_request.date,
        status: post_request.status,
        tags,
        errors,
    })
}

async fn tag_options(pool: &PgPool, selected: &[i32]) -> anyhow::Result<Vec<TagOption>> {
    let tags = sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(tags
        .into_iter()
        .map(|tag| TagOption {
            id: tag.id,
            name: tag.name,
            selected: selected.contains(&tag.id),
        })
        .collect())
}

async fn replace_tags(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    post_id: i32,
    tags: &Option<Vec<i32>>,
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;
    if let Some(tag_ids) = tags {
        for tag_id in tag_ids {
            sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
                .bind(post_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }
    }
    Ok(())
}

fn blank_request() -> PostRequest {
    PostRequest {
        title: String::new(),
        body: String::new(),
        date: Utc::now().date_naive(),
        status: PostStatus::Draft,
        tags: None,
    }
}

fn publish_moment(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn is_slug_collision(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_moment_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            publish_moment(date).to_rfc3339(),
            "2024-03-09T00:00:00+00:00"
        );
    }

    #[test]
    fn blank_request_starts_as_draft() {
        let request = blank_request();
        assert_eq!(request.status, PostStatus::Draft);
        assert!(request.title.is_empty());
        assert!(request.tags.is_none());
    }

    #[test]
    fn post_form_marks_selected_tags_and_status() {
        let form = PostForm {
            common: Common {
                current_page: AdminMenuPages::NewPost,
                blog_name: "My Blog".into(),
                recent_comments: 0,
            },
            heading: "New post",
            action: "?action=new-post".into(),
            title: "A title".into(),
            body: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            status: PostStatus::Published,
            tags: vec![
                TagOption {
                    id: 1,
                    name: "Rust".into(),
                    selected: true,
                },
                TagOption {
                    id: 2,
                    name: "Life".into(),
                    selected: false,
                },
            ],
            errors: Vec::new(),
        };
        let html = form.render().unwrap();
        assert!(html.contains(r#"<option value="1" selected>Rust</option>"#));
        assert!(html.contains(r#"<option value="2">Life</option>"#));
        assert!(html.contains(r#"<option value="published" selected>Published</option>"#));
        assert!(html.contains(r#"value="2024-03-09""#));
    }
}
