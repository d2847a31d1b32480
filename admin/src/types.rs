use std::collections::HashMap;
use std::fmt::Display;

use chrono::NaiveDate;
use serde::Deserialize;
use shared::settings::Settings;
use shared::types::PostStatus;
use sqlx::PgPool;

use crate::session::Session;

#[derive(PartialEq, Eq)]
pub enum AdminMenuPages {
    Dashboard,
    Posts,
    NewPost,
    Comments,
    Tags,
    Settings,
}

impl Display for AdminMenuPages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminMenuPages::Dashboard => write!(f, "dashboard"),
            AdminMenuPages::Posts => write!(f, "posts"),
            AdminMenuPages::NewPost => write!(f, "newpost"),
            AdminMenuPages::Comments => write!(f, "comments"),
            AdminMenuPages::Tags => write!(f, "tags"),
            AdminMenuPages::Settings => write!(f, "settings"),
        }
    }
}

impl PartialEq<&str> for AdminMenuPages {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[derive(Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub body: String,
    pub date: NaiveDate,
    pub status: PostStatus,
    pub tags: Option<Vec<i32>>,
}

pub struct PageGlobals {
    pub query: HashMap<String, String>,
    pub connection_pool: PgPool,
    pub settings: Settings,
    pub session: Session,
}
