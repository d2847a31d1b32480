use std::collections::HashMap;

use askama::Template;
use chrono::NaiveDate;
use shared::types::{HydratedComment, HydratedPost, Tag};
use shared::utils::render_html;
use sqlx::query_as;

use crate::comment::{comment_token, CommentFormView};
use crate::common::{get_common, Common};
use crate::filters;
use crate::response::not_found;
use crate::types::PageGlobals;

#[derive(Template)]
#[template(path = "detail.html")]
struct DetailPage<'a> {
    common: &'a Common,
    post: &'a HydratedPost,
    tags: Vec<Tag>,
    comments: Vec<HydratedComment>,
    similar_posts: Vec<HydratedPost>,
    form: CommentFormView,
}

/// The publish date from the `year`/`month`/`day` query parameters.
/// Anything unparsable, including impossible dates, is simply not a
/// post URL.
fn requested_date(query: &HashMap<String, String>) -> Option<NaiveDate> {
    let year = query.get("year")?.parse().ok()?;
    let month = query.get("month")?.parse().ok()?;
    let day = query.get("day")?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub async fn render(globals: PageGlobals) -> anyhow::Result<cgi::Response> {
    let date = match requested_date(&globals.query) {
        Some(date) => date,
        None => return not_found(),
    };
    let slug = match globals.query.get("slug") {
        Some(slug) => slug,
        None => return not_found(),
    };

    let maybe_post = query_as::<_, HydratedPost>(
        "
SELECT
    posts.id AS id, title, slug, body, publish, updated,
    users.display_name AS author_name,
    (SELECT COUNT(*) FROM comments WHERE comments.post_id = posts.id AND comments.active) AS comment_count,
    (SELECT array_agg(t.name) FROM tags t INNER JOIN post_tags pt ON pt.tag_id = t.id WHERE pt.post_id = posts.id) AS tags
FROM posts
INNER JOIN users ON users.id = posts.author_id
WHERE status = 'published' AND slug = $1 AND utc_day(publish) = $2
",
    )
    .bind(slug)
    .bind(date)
    .fetch_optional(&globals.connection_pool)
    .await?;

    let post = match maybe_post {
        Some(post) => post,
        None => return not_found(),
    };

    let tags = query_as::<_, Tag>(
        "SELECT tags.id, tags.name, tags.slug FROM tags
         INNER JOIN post_tags ON post_tags.tag_id = tags.id
         WHERE post_tags.post_id = $1
         ORDER BY tags.name",
    )
    .bind(post.id)
    .fetch_all(&globals.connection_pool)
    .await?;

    let comments = query_as::<_, HydratedComment>(
        "SELECT name, body, created FROM comments WHERE post_id = $1 AND active ORDER BY created ASC",
    )
    .bind(post.id)
    .fetch_all(&globals.connection_pool)
    .await?;

    let similar_posts = query_as::<_, HydratedPost>(
        "
SELECT
    posts.id AS id, title, slug, body, publish, updated,
    users.display_name AS author_name,
    (SELECT COUNT(*) FROM comments WHERE comments.post_id = posts.id AND comments.active) AS comment_count,
    (SELECT array_agg(t.name) FROM tags t INNER JOIN post_tags pt ON pt.tag_id = t.id WHERE pt.post_id = posts.id) AS tags
FROM posts
INNER JOIN users ON users.id = posts.author_id
INNER JOIN post_tags shared_tags ON shared_tags.post_id = posts.id
WHERE shared_tags.tag_id IN (SELECT tag_id FROM post_tags WHERE post_id = $1)
AND posts.id <> $1
AND status = 'published'
GROUP BY posts.id, users.display_name
ORDER BY COUNT(shared_tags.tag_id) DESC, publish DESC
LIMIT 4
",
    )
    .bind(post.id)
    .fetch_all(&globals.connection_pool)
    .await?;

    let form = CommentFormView::empty(comment_token(&globals, post.id));
    let common = get_common(&globals).await?;
    render_html(DetailPage {
        common: &common,
        post: &post,
        tags,
        comments,
        similar_posts,
        form,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(parts: &[(&str, &str)]) -> HashMap<String, String> {
        parts
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn well_formed_date_parses() {
        let q = query(&[("year", "2024"), ("month", "3"), ("day", "9")]);
        assert_eq!(
            requested_date(&q),
            NaiveDate::from_ymd_opt(2024, 3, 9)
        );
    }

    #[test]
    fn missing_parts_are_rejected() {
        let q = query(&[("year", "2024"), ("month", "3")]);
        assert_eq!(requested_date(&q), None);
    }

    #[test]
    fn non_numeric_parts_are_rejected() {
        let q = query(&[("year", "twenty"), ("month", "3"), ("day", "9")]);
        assert_eq!(requested_date(&q), None);
    }

    #[test]
    fn impossible_dates_are_rejected() {
        let q = query(&[("year", "2024"), ("month", "2"), ("day", "31")]);
        assert_eq!(requested_date(&q), None);
    }

    #[test]
    fn zero_comment_post_renders_the_empty_states() {
        use chrono::{TimeZone, Utc};

        let moment = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let post = HydratedPost {
            id: 7,
            title: "First post".into(),
            slug: "first_post".into(),
            body: "Hello.".into(),
            publish: moment,
            updated: moment,
            author_name: "Author".into(),
            comment_count: 0,
            tags: None,
        };
        let common = Common {
            blog_name: "My Blog".into(),
            base_url: "https://blog.example.com/blog.cgi".into(),
            total_posts: 1,
            latest_posts: Vec::new(),
            most_commented: Vec::new(),
        };
        let page = DetailPage {
            common: &common,
            post: &post,
            tags: Vec::new(),
            comments: Vec::new(),
            similar_posts: Vec::new(),
            form: CommentFormView::empty("token".into()),
        };
        let html = page.render().unwrap();
        assert!(html.contains("There are no comments yet."));
        assert!(html.contains("There are no similar posts yet."));
        assert!(html.contains("?action=share&amp;post=7"));
    }
}
