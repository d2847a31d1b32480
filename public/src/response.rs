use askama::Template;
use shared::utils::render_html_status;

#[derive(Template)]
#[template(path = "404.html")]
struct Page404 {}

#[derive(Template)]
#[template(path = "400.html")]
struct Page400 {}

pub fn not_found() -> anyhow::Result<cgi::Response> {
    render_html_status(404, Page404 {})
}

pub fn bad_request() -> anyhow::Result<cgi::Response> {
    render_html_status(400, Page400 {})
}
