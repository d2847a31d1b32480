use std::collections::HashMap;

use askama::Template;
use async_std::task;
use serde::Deserialize;
use shared::database::connect_db;
use shared::settings::get_settings_struct;
use shared::utils::{parse_query_string, post_body, render_html, render_html_status};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::session::SessionError;
use crate::types::PageGlobals;

mod comments;
mod common;
mod dashboard;
mod filters;
mod post;
mod session;
mod settings;
mod tags;
mod types;

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    password: String,
}

#[derive(Template)]
#[template(path = "index.html")]
struct Index<'a> {
    username: Option<&'a str>,
    message: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "404.html")]
struct Page404;

fn do_404() -> anyhow::Result<cgi::Response> {
    render_html_status(404, Page404)
}

async fn do_login(request: &cgi::Request) -> anyhow::Result<cgi::Response> {
    fn invalid_user(username: &str) -> anyhow::Result<cgi::Response> {
        render_html(Index {
            username: Some(username),
            message: Some("Invalid username or password"),
        })
    }

    if request.method() != "POST" {
        return do_404();
    }

    let form: LoginForm = post_body(request)?;
    let config = shared::config::load_config()?;
    let connection = connect_db(&config.database).await?;

    let single_row =
        sqlx::query_as::<_, UserRow>("SELECT id, password FROM users WHERE username = $1")
            .bind(form.username.as_str())
            .fetch_optional(&connection)
            .await?;

    match single_row {
        None => invalid_user(&form.username),
        Some(user) => match bcrypt::verify(&form.password, &user.password) {
            Ok(true) => session::set_session_and_redirect(&connection, user.id, "dashboard").await,
            Ok(false) => invalid_user(&form.username),
            // A hand-inserted plaintext password row is re-hashed on the
            // first successful login.
            Err(_) if user.password == form.password => {
                let hashed = bcrypt::hash(&form.password, bcrypt::DEFAULT_COST)?;
                sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
                    .bind(hashed)
                    .bind(user.id)
                    .execute(&connection)
                    .await?;
                session::set_session_and_redirect(&connection, user.id, "dashboard").await
            }
            Err(_) => invalid_user(&form.username),
        },
    }
}

async fn process(request: &cgi::Request, query_string: &str) -> anyhow::Result<cgi::Response> {
    let query: HashMap<String, String> = parse_query_string(query_string)?;
    let action = query
        .get("action")
        .cloned()
        .unwrap_or_else(|| "dashboard".to_string());
    info!(action, "serving admin request");

    if action == "login" {
        do_login(request).await
    } else {
        let config = shared::config::load_config()?;
        let connection_pool = connect_db(&config.database).await?;
        let session = session::session_id(&connection_pool, request).await?;
        let settings = get_settings_struct(&connection_pool).await?;
        let globals = PageGlobals {
            query,
            connection_pool,
            settings,
            session,
        };

        match action.as_str() {
            "dashboard" => dashboard::render(globals).await,
            "posts" => post::manage_posts(globals).await,
            "new-post" => post::new_post(request, globals).await,
            "edit_post" => post::edit_post(request, globals).await,
            "comments" => comments::comment_list(globals).await,
            "moderate_comment" => comments::moderate_comment(request, globals).await,
            "tags" => tags::render(request, globals).await,
            "settings" => settings::render(request, globals).await,
            _ => do_404(),
        }
    }
}

fn redirect_session_error(error: anyhow::Error) -> anyhow::Result<cgi::Response> {
    if error.is::<SessionError>() {
        let response = http::response::Builder::new()
            .status(302)
            .header(http::header::LOCATION, "?")
            .header(http::header::SET_COOKIE, "blog_session=; Max-Age=0")
            .body(Vec::new())?;
        Ok(response)
    } else {
        Err(error)
    }
}

cgi::cgi_try_main! {|request: cgi::Request| -> anyhow::Result<cgi::Response> {
    // CGI stdout is the response body, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match request.uri().query() {
        Some(query_string) if !query_string.is_empty() => {
            let query_string = query_string.to_string();
            match task::block_on(process(&request, &query_string)) {
                Err(error) => redirect_session_error(error),
                response => response,
            }
        }
        _ => render_html(Index { username: None, message: None }),
    }
}}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_rejects_anything_but_post() {
        let request = http::Request::builder()
            .method("GET")
            .uri("https://admin.example.com/?action=login")
            .body(Vec::new())
            .unwrap();
        let response = task::block_on(do_login(&request)).unwrap();
        assert_eq!(response.status(), 404);
    }

    #[test]
    fn session_errors_redirect_to_login_and_clear_the_cookie() {
        let response = redirect_session_error(anyhow::anyhow!(SessionError::Expired)).unwrap();
        assert_eq!(response.status(), 302);
        assert_eq!(response.headers()[http::header::LOCATION], "?");
        assert_eq!(
            response.headers()[http::header::SET_COOKIE],
            "blog_session=; Max-Age=0"
        );

        let other = redirect_session_error(anyhow::anyhow!("database is down"));
        assert!(other.is_err());
    }
}
