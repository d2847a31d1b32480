use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::errors::BlogError;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

const NAME_MAX: usize = 80;
const SHARE_NAME_MAX: usize = 25;

fn required(errors: &mut Vec<BlogError>, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(BlogError::input(field, "This field is required"));
        false
    } else {
        true
    }
}

fn valid_email(errors: &mut Vec<BlogError>, field: &str, value: &str) {
    if required(errors, field, value) && !EMAIL.is_match(value.trim()) {
        errors.push(BlogError::input(field, "Enter a valid email address"));
    }
}

fn max_length(errors: &mut Vec<BlogError>, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(BlogError::input(
            field,
            &format!("Ensure this value has at most {} characters", max),
        ));
    }
}

/// A reader's comment submission. Missing fields deserialize to empty
/// strings so they surface as validation errors, not parse failures.
#[derive(Deserialize, Default, Clone)]
pub struct CommentForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub token: String,
}

impl CommentForm {
    pub fn validate(&self) -> Vec<BlogError> {
        let mut errors = Vec::new();
        required(&mut errors, "name", &self.name);
        max_length(&mut errors, "name", &self.name, NAME_MAX);
        valid_email(&mut errors, "email", &self.email);
        required(&mut errors, "body", &self.body);
        errors
    }
}

/// The share-by-email form.
#[derive(Deserialize, Default, Clone)]
pub struct ShareForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub token: String,
}

impl ShareForm {
    pub fn validate(&self) -> Vec<BlogError> {
        let mut errors = Vec::new();
        required(&mut errors, "name", &self.name);
        max_length(&mut errors, "name", &self.name, SHARE_NAME_MAX);
        valid_email(&mut errors, "email", &self.email);
        valid_email(&mut errors, "to", &self.to);
        errors
    }
}

#[derive(Deserialize, Default)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
}

impl SearchForm {
    /// The effective query, or `None` when blank. A blank query renders an
    /// empty result page rather than an error.
    pub fn query(&self) -> Option<&str> {
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_comment() -> CommentForm {
        CommentForm {
            name: "Reader".into(),
            email: "reader@example.com".into(),
            body: "Enjoyed this one.".into(),
            token: String::new(),
        }
    }

    #[test]
    fn complete_comment_passes() {
        assert!(valid_comment().validate().is_empty());
    }

    #[test]
    fn blank_name_is_rejected() {
        let form = CommentForm {
            name: "  ".into(),
            ..valid_comment()
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "name");
    }

    #[test]
    fn overlong_name_is_rejected() {
        let form = CommentForm {
            name: "x".repeat(81),
            ..valid_comment()
        };
        assert_eq!(form.validate()[0].field(), "name");
        let form = CommentForm {
            name: "x".repeat(80),
            ..valid_comment()
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["not-an-address", "a@b", "two words@example.com"] {
            let form = CommentForm {
                email: bad.into(),
                ..valid_comment()
            };
            let errors = form.validate();
            assert_eq!(errors.len(), 1, "{} should fail", bad);
            assert_eq!(errors[0].field(), "email");
        }
    }

    #[test]
    fn empty_comment_reports_every_field() {
        let errors = CommentForm::default().validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["name", "email", "body"]);
    }

    #[test]
    fn share_needs_a_recipient() {
        let form = ShareForm {
            name: "Sender".into(),
            email: "sender@example.com".into(),
            to: String::new(),
            comments: String::new(),
            token: String::new(),
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "to");
    }

    #[test]
    fn overlong_share_name_is_rejected() {
        let form = ShareForm {
            name: "x".repeat(26),
            email: "sender@example.com".into(),
            to: "friend@example.com".into(),
            comments: String::new(),
            token: String::new(),
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "name");
    }

    #[test]
    fn share_comments_are_optional() {
        let form = ShareForm {
            name: "Sender".into(),
            email: "sender@example.com".into(),
            to: "friend@example.com".into(),
            comments: String::new(),
            token: String::new(),
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn blank_search_query_is_none() {
        assert_eq!(SearchForm { query: "  ".into() }.query(), None);
        assert_eq!(SearchForm::default().query(), None);
        assert_eq!(
            SearchForm { query: " rust ".into() }.query(),
            Some("rust")
        );
    }
}
