use sqlx::PgPool;

use std::{
    collections::HashMap,
    fmt::{self, Display},
    str::FromStr,
};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum SettingNames {
    BlogName,
    BaseUrl,
    PageSize,
    SearchThreshold,
    FeedSize,
    SmtpHost,
    SmtpPort,
}

const BLOG_NAME: &str = "blog_name";
const BASE_URL: &str = "base_url";
const PAGE_SIZE: &str = "page_size";
const SEARCH_THRESHOLD: &str = "search_threshold";
const FEED_SIZE: &str = "feed_size";
const SMTP_HOST: &str = "smtp_host";
const SMTP_PORT: &str = "smtp_port";

/// Every setting the admin can edit, in display order.
pub const ALL_SETTINGS: [SettingNames; 7] = [
    SettingNames::BlogName,
    SettingNames::BaseUrl,
    SettingNames::PageSize,
    SettingNames::SearchThreshold,
    SettingNames::FeedSize,
    SettingNames::SmtpHost,
    SettingNames::SmtpPort,
];

impl Display for SettingNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingNames::BlogName => BLOG_NAME,
            SettingNames::BaseUrl => BASE_URL,
            SettingNames::PageSize => PAGE_SIZE,
            SettingNames::SearchThreshold => SEARCH_THRESHOLD,
            SettingNames::FeedSize => FEED_SIZE,
            SettingNames::SmtpHost => SMTP_HOST,
            SettingNames::SmtpPort => SMTP_PORT,
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseSettingNamesError;

impl FromStr for SettingNames {
    type Err = ParseSettingNamesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            BLOG_NAME => Ok(SettingNames::BlogName),
            BASE_URL => Ok(SettingNames::BaseUrl),
            PAGE_SIZE => Ok(SettingNames::PageSize),
            SEARCH_THRESHOLD => Ok(SettingNames::SearchThreshold),
            FEED_SIZE => Ok(SettingNames::FeedSize),
            SMTP_HOST => Ok(SettingNames::SmtpHost),
            SMTP_PORT => Ok(SettingNames::SmtpPort),
            _ => Err(ParseSettingNamesError),
        }
    }
}

/// Site-level configuration stored in `blog_settings` and editable from
/// the admin. The page size and search threshold live here on purpose:
/// they are tuning values, not code.
pub struct Settings {
    pub blog_name: String,
    pub base_url: String,
    pub page_size: i64,
    pub search_threshold: f32,
    pub feed_size: i64,
    pub smtp_host: String,
    pub smtp_port: u16,
}

pub async fn get_settings(
    connection: &PgPool,
) -> anyhow::Result<HashMap<SettingNames, String>> {
    let rows =
        sqlx::query_as::<_, (String, String)>("SELECT setting_name, value FROM blog_settings")
            .fetch_all(connection)
            .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(name, value)| name.parse().ok().map(|n| (n, value)))
        .collect())
}

pub fn settings_from_map(all_settings: &HashMap<SettingNames, String>) -> Settings {
    Settings {
        blog_name: all_settings
            .get(&SettingNames::BlogName)
            .unwrap_or(&"My Blog".into())
            .into(),
        base_url: all_settings
            .get(&SettingNames::BaseUrl)
            .unwrap_or(&"https://blog.example.com/cgi-bin/blog.cgi".into())
            .into(),
        page_size: all_settings
            .get(&SettingNames::PageSize)
            .and_then(|x| x.parse().ok())
            .unwrap_or(3),
        search_threshold: all_settings
            .get(&SettingNames::SearchThreshold)
            .and_then(|x| x.parse().ok())
            .unwrap_or(0.1),
        feed_size: all_settings
            .get(&SettingNames::FeedSize)
            .and_then(|x| x.parse().ok())
            .unwrap_or(5),
        smtp_host: all_settings
            .get(&SettingNames::SmtpHost)
            .unwrap_or(&"localhost".into())
            .into(),
        smtp_port: all_settings
            .get(&SettingNames::SmtpPort)
            .and_then(|x| x.parse().ok())
            .unwrap_or(587),
    }
}

pub async fn get_settings_struct(connection: &PgPool) -> anyhow::Result<Settings> {
    let all_settings = get_settings(connection).await?;
    Ok(settings_from_map(&all_settings))
}
