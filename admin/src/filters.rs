use askama::Result;
use chrono::{DateTime, Utc};

pub fn format_long_datetime(date_time: &DateTime<Utc>) -> Result<String> {
    Ok(date_time.format("%Y-%m-%d %H:%M UTC").to_string())
}

pub fn format_form_date(date_time: &DateTime<Utc>) -> Result<String> {
    Ok(date_time.format("%Y-%m-%d").to_string())
}
