use chrono::{DateTime, Utc};
use shared::markdown::{render_markdown, truncate_html_words};
use shared::types::HydratedPost;
use shared::utils::blog_post_url;

use crate::common::Common;

pub fn posturl(post: &HydratedPost, common: &Common) -> ::askama::Result<String> {
    Ok(blog_post_url(&common.base_url, &post.publish, &post.slug))
}

pub fn format_human_date(date_time: &DateTime<Utc>) -> ::askama::Result<String> {
    Ok(date_time.format("%A, %-d %B, %C%y").to_string())
}

pub fn format_human_datetime(date_time: &DateTime<Utc>) -> ::askama::Result<String> {
    Ok(date_time
        .format("%A, %-d %B, %C%y at %-I:%M%P UTC")
        .to_string())
}

pub fn format_rfc3339_datetime(date_time: &DateTime<Utc>) -> ::askama::Result<String> {
    Ok(date_time.to_rfc3339())
}

pub fn format_rfc2822_datetime(date_time: &DateTime<Utc>) -> ::askama::Result<String> {
    Ok(date_time.to_rfc2822())
}

pub fn pluralise(base: &str, count: &i64) -> ::askama::Result<String> {
    match count {
        1 => Ok(base.to_string()),
        _ => Ok(format!("{}s", base)),
    }
}

pub fn format_markdown<S>(content: S) -> ::askama::Result<String>
where
    S: AsRef<str>,
{
    Ok(render_markdown(content.as_ref()))
}

pub fn truncate_words<S>(content: S, count: usize) -> ::askama::Result<String>
where
    S: AsRef<str>,
{
    Ok(truncate_html_words(content.as_ref(), count))
}
