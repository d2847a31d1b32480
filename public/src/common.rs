use shared::types::HydratedPost;
use sqlx::{query_as, query_scalar};

use crate::types::PageGlobals;

/// Data every page shows: the site identity from settings plus the
/// sidebar widgets (post count, latest posts, most commented posts).
pub struct Common {
    pub blog_name: String,
    pub base_url: String,
    pub total_posts: i64,
    pub latest_posts: Vec<HydratedPost>,
    pub most_commented: Vec<HydratedPost>,
}

/// Look up a single published post by id. Draft posts are invisible
/// here, so commenting on or sharing one 404s like any other bad id.
pub async fn published_post(
    globals: &PageGlobals,
    post_id: i32,
) -> anyhow::Result<Option<HydratedPost>> {
    let post = query_as::<_, HydratedPost>(
        "
SELECT
    posts.id AS id, title, slug, body, publish, updated,
    users.display_name AS author_name,
    (SELECT COUNT(*) FROM comments WHERE comments.post_id = posts.id AND comments.active) AS comment_count,
    (SELECT array_agg(t.name) FROM tags t INNER JOIN post_tags pt ON pt.tag_id = t.id WHERE pt.post_id = posts.id) AS tags
FROM posts
INNER JOIN users ON users.id = posts.author_id
WHERE status = 'published' AND posts.id = $1
",
    )
    .bind(post_id)
    .fetch_optional(&globals.connection_pool)
    .await?;
    Ok(post)
}

pub async fn get_common(globals: &PageGlobals) -> anyhow::Result<Common> {
    let total_posts =
        query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE status = 'published'")
            .fetch_one(&globals.connection_pool)
            .await?;

    let latest_posts = query_as::<_, HydratedPost>(
        "
SELECT
    posts.id AS id, title, slug, body, publish, updated,
    users.display_name AS author_name,
    (SELECT COUNT(*) FROM comments WHERE comments.post_id = posts.id AND comments.active) AS comment_count,
    (SELECT array_agg(t.name) FROM tags t INNER JOIN post_tags pt ON pt.tag_id = t.id WHERE pt.post_id = posts.id) AS tags
FROM posts
INNER JOIN users ON users.id = posts.author_id
WHERE status = 'published'
ORDER BY publish DESC
FETCH FIRST 5 ROWS ONLY
",
    )
    .fetch_all(&globals.connection_pool)
    .await?;

    // The ranking counts every comment, hidden ones included.
    let most_commented = query_as::<_, HydratedPost>(
        "
SELECT
    posts.id AS id, title, slug, body, publish, updated,
    users.display_name AS author_name,
    (SELECT COUNT(*) FROM comments WHERE comments.post_id = posts.id) AS comment_count,
    (SELECT array_agg(t.name) FROM tags t INNER JOIN post_tags pt ON pt.tag_id = t.id WHERE pt.post_id = posts.id) AS tags
FROM posts
INNER JOIN users ON users.id = posts.author_id
WHERE status = 'published'
ORDER BY comment_count DESC, publish DESC
FETCH FIRST 5 ROWS ONLY
",
    )
    .fetch_all(&globals.connection_pool)
    .await?;

    Ok(Common {
        blog_name: globals.settings.blog_name.clone(),
        base_url: globals.settings.base_url.clone(),
        total_posts,
        latest_posts,
        most_commented,
    })
}
