use std::fmt::Display;

use anyhow::anyhow;
use chrono::{DateTime, Days, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const SESSION_COOKIE: &str = "blog_session";

#[derive(sqlx::FromRow)]
pub struct Session {
    #[allow(dead_code)]
    pub id: Uuid,
    pub user_id: i32,
    pub expiry: DateTime<Utc>,
}

#[derive(Debug)]
pub enum SessionError {
    NotFound,
    Expired,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NotFound => write!(f, "Session not found"),
            SessionError::Expired => write!(f, "Session expired"),
        }
    }
}

impl std::error::Error for SessionError {}

fn session_cookie(header: &str) -> Option<&str> {
    header.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

pub async fn session_id(connection: &PgPool, request: &cgi::Request) -> anyhow::Result<Session> {
    let cookie_header = match request.headers().get(http::header::COOKIE) {
        Some(value) => value.to_str()?,
        None => return Err(anyhow!(SessionError::NotFound)),
    };
    let raw_id = session_cookie(cookie_header).ok_or(anyhow!(SessionError::NotFound))?;
    let session_uuid = Uuid::parse_str(raw_id).map_err(|_| anyhow!(SessionError::NotFound))?;

    let saved_session =
        sqlx::query_as::<_, Session>("SELECT id, user_id, expiry FROM sessions WHERE id = $1")
            .bind(session_uuid)
            .fetch_optional(connection)
            .await?;

    match saved_session {
        None => Err(anyhow!(SessionError::NotFound)),
        Some(session) if session.expiry < Utc::now() => Err(anyhow!(SessionError::Expired)),
        Some(session) => Ok(session),
    }
}

pub async fn set_session_and_redirect(
    connection: &PgPool,
    user_id: i32,
    destination: &str,
) -> anyhow::Result<cgi::Response> {
    let session_id = Uuid::new_v4();
    let expiry = Utc::now()
        .checked_add_days(Days::new(2))
        .ok_or(anyhow!("Could not compute session expiry"))?;

    sqlx::query("INSERT INTO sessions (id, user_id, expiry) VALUES ($1, $2, $3)")
        .bind(session_id)
        .bind(user_id)
        .bind(expiry)
        .execute(connection)
        .await?;

    let response = http::response::Builder::new()
        .status(302)
        .header(http::header::LOCATION, format!("?action={}", destination))
        .header(
            http::header::SET_COOKIE,
            format!("{}={}; HttpOnly; Path=/", SESSION_COOKIE, session_id),
        )
        .body(Vec::new())?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_session_cookie_among_others() {
        let header = "theme=dark; blog_session=0b92f1e6-2f5a-4c5e-b303-61a1f0f7a49d; lang=en";
        assert_eq!(
            session_cookie(header),
            Some("0b92f1e6-2f5a-4c5e-b303-61a1f0f7a49d")
        );
    }

    #[test]
    fn missing_cookie_is_none() {
        assert_eq!(session_cookie("theme=dark; lang=en"), None);
        assert_eq!(session_cookie(""), None);
    }
}
