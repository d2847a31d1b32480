use crate::types::{AdminMenuPages, PageGlobals};

pub struct Common {
    pub current_page: AdminMenuPages,
    pub blog_name: String,
    pub recent_comments: i64,
}

pub async fn get_common(
    globals: &PageGlobals,
    current_page: AdminMenuPages,
) -> anyhow::Result<Common> {
    let recent_comments = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM comments WHERE created > CURRENT_TIMESTAMP - INTERVAL '7 days'",
    )
    .fetch_one(&globals.connection_pool)
    .await?;

    Ok(Common {
        current_page,
        blog_name: globals.settings.blog_name.clone(),
        recent_comments,
    })
}
