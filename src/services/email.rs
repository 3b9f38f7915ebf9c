//! Email templating and delivery
//!
//! Templates are pure functions producing subject, text and html bodies.
//! Delivery goes through a [`Mailer`]; [`EmailService::send_email`] reports
//! success as a boolean and never propagates transport failures.

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

/// Rendered email content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// An email ready to be handed to a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: Option<String>,
    pub html: String,
}

impl EmailMessage {
    pub fn from_template(to: &str, template: EmailTemplate) -> Self {
        Self {
            to: to.to_string(),
            subject: template.subject,
            text: Some(template.text),
            html: template.html,
        }
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub mod templates {
    use super::{escape_html, EmailTemplate};

    /// Notify a subscriber that a new article was published
    pub fn new_article_notification(
        recipient_name: &str,
        article_title: &str,
        link: &str,
    ) -> EmailTemplate {
        let subject = format!("{}, a new article is available on PaperHub", recipient_name);

        let text = format!(
            "Hello {name},\n\n\
             A new article matching your interests has been published:\n\n\
             \"{title}\"\n\n\
             Read it here: {link}\n\n\
             You receive this email because you subscribed to the PaperHub newsletter.\n",
            name = recipient_name,
            title = article_title,
            link = link
        );

        let html = format!(
            r#"<html><body>
<p>Hello {name},</p>
<p>A new article matching your interests has been published:</p>
<p><strong>{title}</strong></p>
<p><a href="{link}">Read the article</a></p>
<p style="color:#666">You receive this email because you subscribed to the PaperHub newsletter.</p>
</body></html>"#,
            name = escape_html(recipient_name),
            title = escape_html(article_title),
            link = escape_html(link)
        );

        EmailTemplate { subject, text, html }
    }

    /// Ask a new subscriber to confirm their address
    pub fn subscription_confirmation(base_url: &str, email: &str, token: &str) -> EmailTemplate {
        let link = format!(
            "{}/subscriptions/confirm?token={}",
            base_url.trim_end_matches('/'),
            token
        );

        let subject = "Confirm your PaperHub newsletter subscription".to_string();

        let text = format!(
            "Hello,\n\n\
             Please confirm the newsletter subscription for {email} by opening this link:\n\n\
             {link}\n\n\
             If you did not subscribe, you can ignore this email.\n",
            email = email,
            link = link
        );

        let html = format!(
            r#"<html><body>
<p>Hello,</p>
<p>Please confirm the newsletter subscription for <strong>{email}</strong>.</p>
<p><a href="{link}">Confirm my subscription</a></p>
<p style="color:#666">If you did not subscribe, you can ignore this email.</p>
</body></html>"#,
            email = escape_html(email),
            link = escape_html(&link)
        );

        EmailTemplate { subject, text, html }
    }
}

/// Email transport
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, message: &EmailMessage) -> AppResult<()>;
}

/// SMTP transport backed by lettre
pub struct SmtpMailer {
    config: EmailConfig,
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> AppResult<Self> {
        let builder = if config.smtp_use_tls {
            SmtpTransport::starttls_relay(&config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&config.smtp_host)
        }
        .port(config.smtp_port);

        let builder = if let (Some(username), Some(password)) =
            (&config.smtp_username, &config.smtp_password)
        {
            builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            builder
        };

        Ok(Self {
            transport: builder.build(),
            config,
        })
    }

    fn build_message(&self, message: &EmailMessage) -> AppResult<Message> {
        let from_name = self.config.smtp_from_name.as_deref().unwrap_or("PaperHub");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(&message.to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let html_part = SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone());

        let builder = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(message.subject.clone());

        let email = match message.text {
            Some(ref text) => builder.multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text.clone()),
                    )
                    .singlepart(html_part),
            ),
            None => builder.singlepart(html_part),
        }
        .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        Ok(email)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, message: &EmailMessage) -> AppResult<()> {
        let email = self.build_message(message)?;
        let transport = self.transport.clone();

        // lettre's SmtpTransport is blocking
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| AppError::Internal(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<dyn Mailer>,
    app_url: String,
}

impl EmailService {
    pub fn new(mailer: Arc<dyn Mailer>, app_url: impl Into<String>) -> Self {
        Self {
            mailer,
            app_url: app_url.into(),
        }
    }

    /// Hand a message to the transport. Returns `true` if it was accepted,
    /// `false` on any failure; failures are logged, never returned.
    pub async fn send_email(&self, message: &EmailMessage) -> bool {
        match self.mailer.deliver(message).await {
            Ok(()) => {
                tracing::debug!("Email \"{}\" sent to {}", message.subject, message.to);
                true
            }
            Err(e) => {
                tracing::error!("Failed to send email to {}: {}", message.to, e);
                false
            }
        }
    }

    pub async fn send_subscription_confirmation(&self, email: &str, token: &str) -> bool {
        let template = templates::subscription_confirmation(&self.app_url, email, token);
        self.send_email(&EmailMessage::from_template(email, template)).await
    }

    pub async fn send_new_article_notification(
        &self,
        to: &str,
        recipient_name: &str,
        article_title: &str,
        article_id: &str,
    ) -> bool {
        let link = format!("{}/articles/{}", self.app_url.trim_end_matches('/'), article_id);
        let template = templates::new_article_notification(recipient_name, article_title, &link);
        self.send_email(&EmailMessage::from_template(to, template)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_article_notification() {
        let t = templates::new_article_notification("Alice", "Paper", "http://x");
        assert!(t.subject.contains("Alice"));
        assert!(t.text.contains("Paper"));
        assert!(t.text.contains("http://x"));
        assert!(t.html.contains("href=\"http://x\""));
    }

    #[test]
    fn test_notification_html_is_escaped() {
        let t = templates::new_article_notification("Bob", "On <script> & friends", "http://x");
        assert!(t.html.contains("On &lt;script&gt; &amp; friends"));
        assert!(t.text.contains("On <script> & friends"));
    }

    #[test]
    fn test_subscription_confirmation_embeds_token() {
        let t = templates::subscription_confirmation("https://paperhub.org/", "a@b.org", "tok123");
        assert!(t.subject.contains("Confirm"));
        assert!(t
            .html
            .contains("https://paperhub.org/subscriptions/confirm?token=tok123"));
        assert!(t.text.contains("a@b.org"));
    }

    #[tokio::test]
    async fn test_send_email_true_when_transport_accepts() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_deliver()
            .withf(|m| m.to == "a@b.org" && m.subject == "Hi")
            .times(1)
            .returning(|_| Ok(()));

        let service = EmailService::new(Arc::new(mailer), "http://localhost");
        let message = EmailMessage {
            to: "a@b.org".into(),
            subject: "Hi".into(),
            text: None,
            html: "<p>Hi</p>".into(),
        };
        assert!(service.send_email(&message).await);
    }

    #[tokio::test]
    async fn test_send_email_false_when_transport_fails() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_deliver()
            .returning(|_| Err(AppError::Internal("connection refused".into())));

        let service = EmailService::new(Arc::new(mailer), "http://localhost");
        assert!(!service.send_subscription_confirmation("a@b.org", "tok").await);
    }

    #[tokio::test]
    async fn test_article_notification_link() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_deliver()
            .withf(|m| {
                m.subject.contains("Ada")
                    && m.text.as_deref().unwrap_or_default().contains("https://paperhub.org/articles/a-1")
            })
            .returning(|_| Ok(()));

        let service = EmailService::new(Arc::new(mailer), "https://paperhub.org");
        assert!(
            service
                .send_new_article_notification("ada@example.org", "Ada", "Notes", "a-1")
                .await
        );
    }

    #[test]
    fn test_smtp_message_build() {
        let mailer = SmtpMailer::new(EmailConfig::default()).unwrap();
        let message = EmailMessage::from_template(
            "reader@example.org",
            templates::new_article_notification("Reader", "Paper", "http://x"),
        );
        assert!(mailer.build_message(&message).is_ok());

        let bad = EmailMessage {
            to: "not an address".into(),
            ..message
        };
        assert!(mailer.build_message(&bad).is_err());
    }
}
