use thiserror::Error;

/// A user input problem, scoped to the form field that caused it.
/// Validation collects these; pages render them next to the form.
#[derive(Debug, Error, PartialEq, Clone)]
#[error("{field}: {message}")]
pub struct BlogError {
    field: String,
    message: String,
}

impl BlogError {
    pub fn input(field: &str, message: &str) -> BlogError {
        BlogError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_their_field_and_display_the_message() {
        let error = BlogError::input("email", "Enter a valid email address");
        assert_eq!(error.field(), "email");
        assert_eq!(error.to_string(), "email: Enter a valid email address");
    }

    #[test]
    fn errors_compare_by_field_and_message() {
        assert_eq!(
            BlogError::input("name", "This field is required"),
            BlogError::input("name", "This field is required")
        );
        assert_ne!(
            BlogError::input("name", "This field is required"),
            BlogError::input("body", "This field is required")
        );
    }
}
