use askama::Template;
use shared::errors::BlogError;
use shared::forms::ShareForm;
use shared::token::{form_token, verify_form_token};
use shared::types::HydratedPost;
use shared::utils::{blog_post_url, post_body, render_html};

use crate::common::{get_common, published_post, Common};
use crate::filters;
use crate::mail::{build_share_email, send_share_email};
use crate::response::not_found;
use crate::types::PageGlobals;

pub struct ShareFormView {
    pub name: String,
    pub email: String,
    pub to: String,
    pub comments: String,
    pub token: String,
    pub errors: Vec<BlogError>,
}

impl ShareFormView {
    fn empty(token: String) -> ShareFormView {
        ShareFormView {
            name: String::new(),
            email: String::new(),
            to: String::new(),
            comments: String::new(),
            token,
            errors: Vec::new(),
        }
    }

    fn submitted(form: &ShareForm, token: String, errors: Vec<BlogError>) -> ShareFormView {
        ShareFormView {
            name: form.name.clone(),
            email: form.email.clone(),
            to: form.to.clone(),
            comments: form.comments.clone(),
            token,
            errors,
        }
    }
}

fn token_scope(post_id: i32) -> String {
    format!("share:{}", post_id)
}

#[derive(Template)]
#[template(path = "share.html")]
struct SharePage<'a> {
    common: &'a Common,
    post: &'a HydratedPost,
    form: ShareFormView,
    sent: bool,
}

/// Share a post by email. GET renders the form; a valid POST sends
/// exactly one message and confirms, an invalid one re-renders with
/// errors and sends nothing.
pub async fn render(request: &cgi::Request, globals: PageGlobals) -> anyhow::Result<cgi::Response> {
    let post_id: i32 = match globals.query.get("post").map(|raw| raw.parse()) {
        Some(Ok(id)) => id,
        _ => return not_found(),
    };
    let post = match published_post(&globals, post_id).await? {
        Some(post) => post,
        None => return not_found(),
    };

    let token = form_token(&globals.config.secret_key, &token_scope(post_id));
    let mut sent = false;
    let form_view = if request.method() == "POST" {
        let form: ShareForm = post_body(request)?;
        let mut errors = form.validate();
        if !verify_form_token(
            &globals.config.secret_key,
            &token_scope(post_id),
            &form.token,
        ) {
            errors.push(BlogError::input(
                "form",
                "Your form session expired. Please submit the form again.",
            ));
        }

        if errors.is_empty() {
            let post_url = blog_post_url(&globals.settings.base_url, &post.publish, &post.slug);
            let email = build_share_email(
                form.name.trim(),
                form.to.trim(),
                form.comments.trim(),
                &post.title,
                &post_url,
            );
            send_share_email(&globals.settings, &globals.config.mail, &email)?;
            sent = true;
        }
        ShareFormView::submitted(&form, token, errors)
    } else {
        ShareFormView::empty(token)
    };

    let common = get_common(&globals).await?;
    render_html(SharePage {
        common: &common,
        post: &post,
        form: form_view,
        sent,
    })
}
