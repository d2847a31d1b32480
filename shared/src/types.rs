use chrono::{DateTime, Utc};
use std::fmt;

#[derive(serde::Deserialize, sqlx::Type, fmt::Debug, PartialEq, Clone, Copy)]
#[sqlx(type_name = "post_status")] // only for PostgreSQL to match a type definition
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "draft"),
            PostStatus::Published => write!(f, "published"),
        }
    }
}

/// A full post row, as the admin sees it. Reader-facing pages use
/// [`HydratedPost`] instead.
#[derive(sqlx::FromRow, Clone)]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub status: PostStatus,
}

/// A published post joined with everything the public templates need:
/// the author's display name, the active comment count and the tag names.
#[derive(sqlx::FromRow, Clone)]
pub struct HydratedPost {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub author_name: String,
    pub comment_count: i64,
    pub tags: Option<Vec<String>>,
}

#[derive(sqlx::FromRow)]
pub struct HydratedComment {
    pub name: String,
    pub body: String,
    pub created: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub slug: String,
}
