use askama::Template;
use shared::forms::SearchForm;
use shared::types::HydratedPost;
use shared::utils::render_html;
use sqlx::query_as;

use crate::common::{get_common, Common};
use crate::filters;
use crate::types::PageGlobals;

#[derive(Template)]
#[template(path = "search.html")]
struct SearchPage<'a> {
    common: &'a Common,
    query: Option<&'a str>,
    results: Vec<HydratedPost>,
}

/// Trigram search over published posts. A post matches when the better
/// of its title and body similarity clears the configured threshold;
/// results come back best match first.
pub async fn render(globals: PageGlobals) -> anyhow::Result<cgi::Response> {
    let form = SearchForm {
        query: globals.query.get("query").cloned().unwrap_or_default(),
    };

    let results = match form.query() {
        Some(q) => query_as::<_, HydratedPost>(
            "
SELECT
    posts.id AS id, title, slug, body, publish, updated,
    users.display_name AS author_name,
    (SELECT COUNT(*) FROM comments WHERE comments.post_id = posts.id AND comments.active) AS comment_count,
    (SELECT array_agg(t.name) FROM tags t INNER JOIN post_tags pt ON pt.tag_id = t.id WHERE pt.post_id = posts.id) AS tags
FROM posts
INNER JOIN users ON users.id = posts.author_id
WHERE status = 'published'
AND GREATEST(similarity(title, $1), similarity(body, $1)) > $2
ORDER BY GREATEST(similarity(title, $1), similarity(body, $1)) DESC
",
        )
        .bind(q)
        .bind(globals.settings.search_threshold)
        .fetch_all(&globals.connection_pool)
        .await?,
        None => Vec::new(),
    };

    let common = get_common(&globals).await?;
    render_html(SearchPage {
        common: &common,
        query: form.query(),
        results,
    })
}
