use askama::Template;
use shared::pagination::{Page, Pager};
use shared::types::{HydratedPost, Tag};
use shared::utils::render_html;
use sqlx::{query_as, query_scalar};

use crate::common::{get_common, Common};
use crate::filters;
use crate::response::not_found;
use crate::types::PageGlobals;

#[derive(Template)]
#[template(path = "list.html")]
struct ListPage<'a> {
    common: &'a Common,
    posts: Vec<HydratedPost>,
    page: Page,
    tag: Option<Tag>,
    previous_url: Option<String>,
    next_url: Option<String>,
}

pub async fn render(globals: PageGlobals) -> anyhow::Result<cgi::Response> {
    let tag = match globals.query.get("tag") {
        Some(slug) => {
            let found = query_as::<_, Tag>("SELECT id, name, slug FROM tags WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&globals.connection_pool)
                .await?;
            match found {
                Some(tag) => Some(tag),
                None => return not_found(),
            }
        }
        None => None,
    };

    let total_items = match &tag {
        Some(tag) => query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM posts WHERE status = 'published'
             AND id IN (SELECT post_id FROM post_tags WHERE tag_id = $1)",
        )
        .bind(tag.id)
        .fetch_one(&globals.connection_pool)
        .await?,
        None => query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE status = 'published'")
            .fetch_one(&globals.connection_pool)
            .await?,
    };

    let pager = Pager::new(globals.settings.page_size, total_items);
    let page = pager.page(globals.query.get("page").map(String::as_str));

    let posts = match &tag {
        Some(tag) => query_as::<_, HydratedPost>(
            "
SELECT
    posts.id AS id, title, slug, body, publish, updated,
    users.display_name AS author_name,
    (SELECT COUNT(*) FROM comments WHERE comments.post_id = posts.id AND comments.active) AS comment_count,
    (SELECT array_agg(t.name) FROM tags t INNER JOIN post_tags pt ON pt.tag_id = t.id WHERE pt.post_id = posts.id) AS tags
FROM posts
INNER JOIN users ON users.id = posts.author_id
WHERE status = 'published'
AND posts.id IN (SELECT post_id FROM post_tags WHERE tag_id = $1)
ORDER BY publish DESC
OFFSET $2 ROWS FETCH NEXT $3 ROWS ONLY
",
        )
        .bind(tag.id)
        .bind(pager.offset(page.number))
        .bind(pager.limit())
        .fetch_all(&globals.connection_pool)
        .await?,
        None => query_as::<_, HydratedPost>(
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
OFFSET $1 ROWS FETCH NEXT $2 ROWS ONLY
",
        )
        .bind(pager.offset(page.number))
        .bind(pager.limit())
        .fetch_all(&globals.connection_pool)
        .await?,
    };

    let previous_url = if page.has_previous() {
        Some(page_url(&tag, page.previous()))
    } else {
        None
    };
    let next_url = if page.has_next() {
        Some(page_url(&tag, page.next()))
    } else {
        None
    };

    let common = get_common(&globals).await?;
    render_html(ListPage {
        common: &common,
        posts,
        page,
        tag,
        previous_url,
        next_url,
    })
}

fn page_url(tag: &Option<Tag>, number: i64) -> String {
    match tag {
        Some(tag) => format!("?action=list&tag={}&page={}", tag.slug, number),
        None => format!("?action=list&page={}", number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    #[test]
    fn page_urls_keep_the_tag_filter() {
        assert_eq!(page_url(&None, 2), "?action=list&page=2");
        let tag = Tag {
            id: 1,
            name: "Rust".into(),
            slug: "rust".into(),
        };
        assert_eq!(page_url(&Some(tag), 3), "?action=list&tag=rust&page=3");
    }

    fn sample_post(title: &str, slug: &str) -> HydratedPost {
        let moment = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        HydratedPost {
            id: 1,
            title: title.into(),
            slug: slug.into(),
            body: "A short body.".into(),
            publish: moment,
            updated: moment,
            author_name: "Author".into(),
            comment_count: 2,
            tags: Some(vec!["rust".into()]),
        }
    }

    fn sample_common() -> Common {
        Common {
            blog_name: "My Blog".into(),
            base_url: "https://blog.example.com/blog.cgi".into(),
            total_posts: 1,
            latest_posts: Vec::new(),
            most_commented: Vec::new(),
        }
    }

    #[test]
    fn list_page_renders_posts_and_pagination() {
        let common = sample_common();
        let page = ListPage {
            common: &common,
            posts: vec![sample_post("First post", "first_post")],
            page: Page {
                number: 2,
                total_pages: 5,
            },
            tag: None,
            previous_url: Some(page_url(&None, 1)),
            next_url: Some(page_url(&None, 3)),
        };
        let html = page.render().unwrap();
        assert!(html.contains("First post"));
        assert!(html.contains("2 comments"));
        assert!(html.contains("Page 2 of 5"));
        assert!(html.contains("?action=list&amp;page=3"));
    }

    #[test]
    fn tag_page_names_the_tag() {
        let common = sample_common();
        let page = ListPage {
            common: &common,
            posts: Vec::new(),
            page: Page {
                number: 1,
                total_pages: 1,
            },
            tag: Some(Tag {
                id: 1,
                name: "Rust".into(),
                slug: "rust".into(),
            }),
            previous_url: None,
            next_url: None,
        };
        let html = page.render().unwrap();
        assert!(html.contains("Posts tagged \"Rust\""));
    }
}
