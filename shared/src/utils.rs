use std::str::FromStr;

use anyhow::anyhow;
use askama::Template;
use chrono::{DateTime, Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_querystring::{from_bytes, from_str, ParseMode};

pub fn post_body<T: for<'a> Deserialize<'a>>(request: &cgi::Request) -> anyhow::Result<T> {
    let body = request.body();
    let result = from_bytes(body, ParseMode::Duplicate);
    result.map_err(|e| anyhow!(e))
}

pub fn render_html<T: Template>(template: T) -> anyhow::Result<cgi::Response> {
    render_html_status(200, template)
}

pub fn render_html_status<S, T: Template>(status: S, template: T) -> anyhow::Result<cgi::Response>
where
    cgi::http::StatusCode: TryFrom<S>,
    <cgi::http::StatusCode as TryFrom<S>>::Error: Into<cgi::http::Error>,
{
    let content = template.render()?;
    Ok(cgi::html_response(status, content))
}

/// Render an XML template with the given content type. Feeds and the
/// sitemap go through here instead of [`render_html`].
pub fn render_xml<T: Template>(content_type: &str, template: T) -> anyhow::Result<cgi::Response> {
    let content = template.render()?;
    let response = cgi::http::response::Builder::new()
        .status(200)
        .header(cgi::http::header::CONTENT_TYPE, content_type)
        .body(content.into_bytes())?;
    Ok(response)
}

pub fn parse_query_string<T: for<'a> Deserialize<'a>>(query_string: &str) -> anyhow::Result<T> {
    from_str(query_string, ParseMode::UrlEncoded).map_err(|e| anyhow!(e))
}

pub fn render_redirect(action: &str) -> anyhow::Result<cgi::Response> {
    let body: Vec<u8> = "Redirecting".as_bytes().to_vec();
    let response = cgi::http::response::Builder::new()
        .status(302)
        .header(cgi::http::header::LOCATION, format!("?action={}", action))
        .body(body)?;
    Ok(response)
}

pub trait BlogUtils {
    fn parse_into<T: FromStr>(&self) -> anyhow::Result<T>;
}

impl BlogUtils for str {
    fn parse_into<T: FromStr>(&self) -> anyhow::Result<T> {
        self.parse().map_err(|_| anyhow!("Failed to parse string"))
    }
}

impl BlogUtils for Option<&String> {
    fn parse_into<T: FromStr>(&self) -> anyhow::Result<T> {
        self.ok_or(anyhow!("String was none"))?
            .parse()
            .map_err(|_| anyhow!("Failed to parse string"))
    }
}

lazy_static! {
    static ref INVALID_SLUG_CHARS: Regex = Regex::new(r"[^a-z0-9_-]+").unwrap();
}

/// Derive a URL slug from a post title. Uniqueness per publish day is the
/// database's job; this only normalizes the text.
pub fn slugify(title: &str) -> String {
    let mut lowered = title.to_owned();
    lowered.make_ascii_lowercase();
    INVALID_SLUG_CHARS
        .replace_all(&lowered, " ")
        .trim()
        .replace(' ', "_")
}

/// Canonical URL of a post. Date components are the UTC publish date,
/// matching the scope of the slug uniqueness constraint.
pub fn blog_post_url(base_url: &str, publish: &DateTime<Utc>, slug: &str) -> String {
    format!(
        "{}?action=post&year={}&month={}&day={}&slug={}",
        base_url,
        publish.year(),
        publish.month(),
        publish.day(),
        slug
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    #[test]
    fn slugify_normalizes_titles() {
        assert_eq!(slugify("Hello, World!"), "hello_world");
        assert_eq!(slugify("  Spaced   out  "), "spaced_out");
        assert_eq!(slugify("keeps-dashes_and_underscores"), "keeps-dashes_and_underscores");
        assert_eq!(slugify("Ünïcode steamrolled"), "nicode_steamrolled");
    }

    #[test]
    fn post_urls_carry_the_utc_date() {
        let publish = Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap();
        assert_eq!(
            blog_post_url("https://example.com/blog.cgi", &publish, "first_post"),
            "https://example.com/blog.cgi?action=post&year=2024&month=3&day=9&slug=first_post"
        );
    }

    #[test]
    fn query_strings_parse_to_maps() {
        let parsed: HashMap<String, String> =
            parse_query_string("action=post&year=2024&slug=first_post").unwrap();
        assert_eq!(parsed.get("action"), Some(&"post".to_string()));
        assert_eq!(parsed.get("year"), Some(&"2024".to_string()));
        assert_eq!(parsed.get("missing"), None);
    }

    #[test]
    fn parse_into_reports_failure() {
        let number: anyhow::Result<i32> = "12".parse_into();
        assert_eq!(number.unwrap(), 12);
        let bad: anyhow::Result<i32> = "twelve".parse_into();
        assert!(bad.is_err());
    }

    #[test]
    fn query_map_values_parse_through_the_option_impl() {
        let query = HashMap::from([("id".to_string(), "7".to_string())]);
        let id: i32 = query.get("id").parse_into().unwrap();
        assert_eq!(id, 7);
        let missing: anyhow::Result<i32> = query.get("absent").parse_into();
        assert!(missing.is_err());
    }
}
