use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use shared::config::MailConfig;
use shared::settings::Settings;

/// A composed share email. Building is split from sending so the exact
/// wording can be unit tested without an SMTP server.
pub struct ShareEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub fn build_share_email(
    name: &str,
    to: &str,
    comments: &str,
    post_title: &str,
    post_url: &str,
) -> ShareEmail {
    ShareEmail {
        to: to.to_string(),
        subject: format!("{} recommends you read {}", name, post_title),
        body: format!(
            "Read {} at {}\n\n{}'s comments: {}",
            post_title, post_url, name, comments
        ),
    }
}

/// Send one share email over STARTTLS. No retries: a refused relay or
/// bad recipient propagates straight up to the 500 handler.
pub fn send_share_email(
    settings: &Settings,
    mail: &MailConfig,
    email: &ShareEmail,
) -> anyhow::Result<()> {
    let message = Message::builder()
        .from(mail.username.parse()?)
        .to(email.to.parse()?)
        .subject(&email.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())?;

    let mailer = SmtpTransport::starttls_relay(&settings.smtp_host)?
        .port(settings.smtp_port)
        .credentials(Credentials::new(
            mail.username.clone(),
            mail.password.clone(),
        ))
        .build();

    mailer.send(&message)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_email_wording() {
        let email = build_share_email(
            "Alice",
            "friend@example.com",
            "Worth your time.",
            "First post",
            "https://blog.example.com/cgi-bin/blog.cgi?action=post&year=2024&month=3&day=9&slug=first_post",
        );
        assert_eq!(email.to, "friend@example.com");
        assert_eq!(email.subject, "Alice recommends you read First post");
        assert_eq!(
            email.body,
            "Read First post at https://blog.example.com/cgi-bin/blog.cgi?action=post&year=2024&month=3&day=9&slug=first_post\n\nAlice's comments: Worth your time."
        );
    }

    #[test]
    fn empty_comments_still_read_naturally() {
        let email = build_share_email("Bob", "x@example.com", "", "A post", "https://e/p");
        assert_eq!(email.body, "Read A post at https://e/p\n\nBob's comments: ");
    }
}
