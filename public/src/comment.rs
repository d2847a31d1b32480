use askama::Template;
use shared::errors::BlogError;
use shared::forms::CommentForm;
use shared::token::{form_token, verify_form_token};
use shared::types::HydratedPost;
use shared::utils::{post_body, render_html};
use sqlx::query;

use crate::common::{get_common, published_post, Common};
use crate::filters;
use crate::response::not_found;
use crate::types::PageGlobals;

/// The comment form as rendered: entered values plus any validation
/// errors. The post detail page embeds an empty one.
pub struct CommentFormView {
    pub name: String,
    pub email: String,
    pub body: String,
    pub token: String,
    pub errors: Vec<BlogError>,
}

impl CommentFormView {
    pub fn empty(token: String) -> CommentFormView {
        CommentFormView {
            name: String::new(),
            email: String::new(),
            body: String::new(),
            token,
            errors: Vec::new(),
        }
    }

    fn submitted(form: &CommentForm, token: String, errors: Vec<BlogError>) -> CommentFormView {
        CommentFormView {
            name: form.name.clone(),
            email: form.email.clone(),
            body: form.body.clone(),
            token,
            errors,
        }
    }
}

fn token_scope(post_id: i32) -> String {
    format!("comment:{}", post_id)
}

pub fn comment_token(globals: &PageGlobals, post_id: i32) -> String {
    form_token(&globals.config.secret_key, &token_scope(post_id))
}

#[derive(Template)]
#[template(path = "comment.html")]
struct CommentPage<'a> {
    common: &'a Common,
    post: &'a HydratedPost,
    form: CommentFormView,
    posted: bool,
}

/// Handle a comment submission. POST only; a valid submission inserts
/// exactly one row, an invalid one re-renders the form with errors and
/// touches nothing.
pub async fn render(request: &cgi::Request, globals: PageGlobals) -> anyhow::Result<cgi::Response> {
    if request.method() != "POST" {
        return not_found();
    }
    let post_id: i32 = match globals.query.get("post").map(|raw| raw.parse()) {
        Some(Ok(id)) => id,
        _ => return not_found(),
    };
    let post = match published_post(&globals, post_id).await? {
        Some(post) => post,
        None => return not_found(),
    };

    let form: CommentForm = post_body(request)?;
    let mut errors = form.validate();
    if !verify_form_token(
        &globals.config.secret_key,
        &token_scope(post_id),
        &form.token,
    ) {
        errors.push(BlogError::input(
            "form",
            "Your form session expired. Please submit the comment again.",
        ));
    }

    let posted = errors.is_empty();
    if posted {
        query("INSERT INTO comments (post_id, name, email, body) VALUES ($1, $2, $3, $4)")
            .bind(post_id)
            .bind(form.name.trim())
            .bind(form.email.trim())
            .bind(form.body.trim())
            .execute(&globals.connection_pool)
            .await?;
    }

    let token = comment_token(&globals, post_id);
    let form_view = if posted {
        CommentFormView::empty(token)
    } else {
        CommentFormView::submitted(&form, token, errors)
    };

    let common = get_common(&globals).await?;
    render_html(CommentPage {
        common: &common,
        post: &post,
        form: form_view,
        posted,
    })
}
