use askama::Template;
use chrono::{DateTime, Utc};
use shared::types::HydratedPost;
use shared::utils::render_xml;
use sqlx::query_as;

use crate::common::{get_common, Common};
use crate::filters;
use crate::types::PageGlobals;

#[derive(Template)]
#[template(path = "feed.xml")]
struct FeedPage<'a> {
    common: &'a Common,
    posts: Vec<HydratedPost>,
    date: DateTime<Utc>,
}

pub async fn render(globals: PageGlobals) -> anyhow::Result<cgi::Response> {
    let posts = query_as::<_, HydratedPost>(
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
FETCH FIRST $1 ROWS ONLY
",
    )
    .bind(globals.settings.feed_size)
    .fetch_all(&globals.connection_pool)
    .await?;

    let common = get_common(&globals).await?;
    render_xml(
        "application/rss+xml",
        FeedPage {
            common: &common,
            posts,
            date: Utc::now(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn feed_items_carry_truncated_descriptions() {
        let moment = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let long_body = "word ".repeat(40);
        let post = HydratedPost {
            id: 1,
            title: "First post".into(),
            slug: "first_post".into(),
            body: long_body,
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
        let xml = FeedPage {
            common: &common,
            posts: vec![post],
            date: moment,
        }
        .render()
        .unwrap();

        assert!(xml.contains("<rss version=\"2.0\">"));
        assert!(xml.contains("<title>First post</title>"));
        // Markup in the description is entity-encoded and the body is cut
        // at thirty words.
        assert!(xml.contains("&lt;p&gt;"));
        assert!(xml.contains("…"));
        assert_eq!(xml.matches("word").count(), 30);
    }
}
