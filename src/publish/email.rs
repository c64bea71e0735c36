use super::{Post, Publisher};
use crate::config::{MailConfig, Secrets};
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

/// Sends posts as HTML email to the blog's post-by-email inbox.
pub struct EmailPublisher {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    dry_run: bool,
}

impl EmailPublisher {
    pub fn new(config: &MailConfig, secrets: &Secrets, dry_run: bool) -> Result<Self> {
        let from: Mailbox = secrets
            .mail_user
            .parse()
            .with_context(|| format!("sending address is invalid: {}", secrets.mail_user))?;
        let to: Mailbox = secrets
            .publish_address
            .parse()
            .with_context(|| format!("publishing address is invalid: {}", secrets.publish_address))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .with_context(|| format!("smtp relay init failed for {}", config.smtp_host))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                secrets.mail_user.clone(),
                secrets.mail_password.clone(),
            ))
            .timeout(Some(Duration::from_millis(config.timeout_ms)))
            .build();

        Ok(Self { transport, from, to, dry_run })
    }
}

pub fn build_message(from: Mailbox, to: Mailbox, post: &Post) -> Result<Message> {
    Message::builder()
        .from(from)
        .to(to)
        .subject(post.subject())
        .header(ContentType::TEXT_HTML)
        .body(post.html.clone())
        .context("failed to build email message")
}

#[async_trait]
impl Publisher for EmailPublisher {
    async fn publish(&self, post: &Post) -> Result<()> {
        let message = build_message(self.from.clone(), self.to.clone(), post)?;

        if self.dry_run {
            tracing::info!(
                subject = %post.subject(),
                to = %self.to,
                bytes = post.html.len(),
                "DRY RUN: would send post"
            );
            tracing::debug!(html = %post.html, "DRY RUN: post body");
            return Ok(());
        }

        let response = self
            .transport
            .send(message)
            .await
            .with_context(|| format!("smtp send to {} failed", self.to))?;

        tracing::info!(
            subject = %post.subject(),
            code = %response.code(),
            "post sent"
        );
        Ok(())
    }
}
