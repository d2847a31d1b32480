use std::collections::HashMap;

use askama::Template;
use shared::settings::{get_settings_struct, Settings, ALL_SETTINGS};
use shared::utils::{post_body, render_html};

use crate::common::{get_common, Common};
use crate::types::{AdminMenuPages, PageGlobals};

#[derive(Template)]
#[template(path = "settings.html")]
struct SettingsPage {
    common: Common,
    settings: Settings,
    saved: bool,
}

pub async fn render(
    request: &cgi::Request,
    mut globals: PageGlobals,
) -> anyhow::Result<cgi::Response> {
    let mut saved = false;
    if request.method() == "POST" {
        let content: HashMap<String, String> = post_body(request)?;
        for setting in ALL_SETTINGS {
            if let Some(value) = content.get(&setting.to_string()) {
                sqlx::query(
                    "INSERT INTO blog_settings (setting_name, value) VALUES ($1, $2)
ON CONFLICT (setting_name) DO UPDATE SET value = EXCLUDED.value",
                )
                .bind(setting.to_string())
                .bind(value)
                .execute(&globals.connection_pool)
                .await?;
            }
        }
        globals.settings = get_settings_struct(&globals.connection_pool).await?;
        saved = true;
    }

    let common = get_common(&globals, AdminMenuPages::Settings).await?;
    render_html(SettingsPage {
        common,
        settings: globals.settings,
        saved,
    })
}
