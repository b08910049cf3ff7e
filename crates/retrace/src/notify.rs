//! Notification boundary for rendered failure reports.
//!
//! retrace does not speak SMTP itself. A [`Notifier`] validates a
//! [`Notification`], resolves it into an [`Envelope`] with the configured
//! sender, and hands that to a [`MailTransport`] supplied by the caller.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::report::Report;

/// Outbound mail server and sender address.
///
/// Deserialization goes through [`SmtpServerConfig::new`], so blank values
/// are rejected there too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSmtpServerConfig")]
pub struct SmtpServerConfig {
    server_address: String,
    from_address: String,
}

#[derive(Deserialize)]
struct RawSmtpServerConfig {
    server_address: String,
    from_address: String,
}

impl TryFrom<RawSmtpServerConfig> for SmtpServerConfig {
    type Error = Error;

    fn try_from(raw: RawSmtpServerConfig) -> Result<Self> {
        Self::new(raw.server_address, raw.from_address)
    }
}

impl SmtpServerConfig {
    /// Create a server configuration.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if either value is blank.
    pub fn new(
        server_address: impl Into<String>,
        from_address: impl Into<String>,
    ) -> Result<Self> {
        let server_address = server_address.into();
        let from_address = from_address.into();
        if server_address.trim().is_empty() {
            return Err(Error::invalid_input("SMTP server address must not be empty"));
        }
        if from_address.trim().is_empty() {
            return Err(Error::invalid_input("sender address must not be empty"));
        }
        Ok(Self {
            server_address,
            from_address,
        })
    }

    /// SMTP server address.
    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    /// Sender address.
    pub fn from_address(&self) -> &str {
        &self.from_address
    }
}

/// A notification to send: recipients, subject, HTML body and extras.
///
/// Optional lists are plain `Vec`s; absent values become empty lists when the
/// notification is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    to: Vec<String>,
    subject: String,
    html_body: String,
    cc: Vec<String>,
    attachments: Vec<PathBuf>,
    reply_to: Vec<String>,
}

impl Notification {
    /// Create a notification with no CC, attachments or reply-to addresses.
    ///
    /// The recipient list is checked when the notification is sent.
    pub fn new(
        to: Vec<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            to,
            subject: subject.into(),
            html_body: html_body.into(),
            cc: Vec::new(),
            attachments: Vec::new(),
            reply_to: Vec::new(),
        }
    }

    /// Create a builder for a notification.
    pub fn builder() -> NotificationBuilder {
        NotificationBuilder::default()
    }

    /// Check the notification can be delivered.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if there are no recipients or a recipient is
    /// blank.
    pub fn validate(&self) -> Result<()> {
        if self.to.is_empty() {
            return Err(Error::invalid_input("the 'to' address list must not be empty"));
        }
        if self.to.iter().any(|addr| addr.trim().is_empty()) {
            return Err(Error::invalid_input("recipient addresses must not be blank"));
        }
        Ok(())
    }

    /// Recipient addresses.
    pub fn to(&self) -> &[String] {
        &self.to
    }

    /// Subject line.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// HTML body.
    pub fn html_body(&self) -> &str {
        &self.html_body
    }

    /// CC addresses.
    pub fn cc(&self) -> &[String] {
        &self.cc
    }

    /// Files to attach.
    pub fn attachments(&self) -> &[PathBuf] {
        &self.attachments
    }

    /// Reply-to addresses.
    pub fn reply_to(&self) -> &[String] {
        &self.reply_to
    }
}

/// Builder for [`Notification`].
#[derive(Debug, Default)]
pub struct NotificationBuilder {
    to: Vec<String>,
    subject: Option<String>,
    html_body: Option<String>,
    cc: Option<Vec<String>>,
    attachments: Option<Vec<PathBuf>>,
    reply_to: Option<Vec<String>>,
}

impl NotificationBuilder {
    /// Add a recipient.
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Add several recipients.
    pub fn to_addresses<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.to.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Set the subject line.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the HTML body.
    pub fn html_body(mut self, html_body: impl Into<String>) -> Self {
        self.html_body = Some(html_body.into());
        self
    }

    /// Set the CC list.
    pub fn cc(mut self, cc: Option<Vec<String>>) -> Self {
        self.cc = cc;
        self
    }

    /// Set the attachment list.
    pub fn attachments(mut self, attachments: Option<Vec<PathBuf>>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Set the reply-to list.
    pub fn reply_to(mut self, reply_to: Option<Vec<String>>) -> Self {
        self.reply_to = reply_to;
        self
    }

    /// Build and validate the notification.
    ///
    /// # Errors
    ///
    /// See [`Notification::validate`].
    pub fn build(self) -> Result<Notification> {
        let notification = Notification {
            to: self.to,
            subject: self.subject.unwrap_or_default(),
            html_body: self.html_body.unwrap_or_default(),
            cc: self.cc.unwrap_or_default(),
            attachments: self.attachments.unwrap_or_default(),
            reply_to: self.reply_to.unwrap_or_default(),
        };
        notification.validate()?;
        Ok(notification)
    }
}

/// A fully resolved message, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// SMTP server to deliver through
    pub server_address: String,
    /// Sender address
    pub from: String,
    /// Recipients, never empty
    pub to: Vec<String>,
    /// CC recipients, blank entries removed
    pub cc: Vec<String>,
    /// Reply-to addresses
    pub reply_to: Vec<String>,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html_body: String,
    /// Files to attach
    pub attachments: Vec<PathBuf>,
}

/// Delivers envelopes. Implemented outside this crate, e.g. over SMTP.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver one envelope.
    async fn deliver(&self, envelope: Envelope) -> Result<()>;
}

#[async_trait]
impl<T: MailTransport + ?Sized> MailTransport for std::sync::Arc<T> {
    async fn deliver(&self, envelope: Envelope) -> Result<()> {
        (**self).deliver(envelope).await
    }
}

/// Validates notifications and forwards them to a [`MailTransport`].
#[derive(Debug)]
pub struct Notifier<T> {
    smtp: SmtpServerConfig,
    transport: T,
}

impl<T: MailTransport> Notifier<T> {
    /// Create a notifier sending from `smtp` through `transport`.
    pub fn new(smtp: SmtpServerConfig, transport: T) -> Self {
        Self { smtp, transport }
    }

    /// Server configuration in use.
    pub fn smtp(&self) -> &SmtpServerConfig {
        &self.smtp
    }

    /// Resolve a notification into the envelope handed to the transport.
    pub fn envelope(&self, notification: &Notification) -> Envelope {
        Envelope {
            server_address: self.smtp.server_address.clone(),
            from: self.smtp.from_address.clone(),
            to: notification.to.clone(),
            cc: notification
                .cc
                .iter()
                .filter(|addr| !addr.is_empty())
                .cloned()
                .collect(),
            reply_to: notification.reply_to.clone(),
            subject: notification.subject.clone(),
            html_body: notification.html_body.clone(),
            attachments: notification.attachments.clone(),
        }
    }

    /// Validate and deliver a notification.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] before the transport is touched if the
    /// notification has no recipients; otherwise whatever the transport
    /// returns.
    pub async fn send(&self, notification: &Notification) -> Result<()> {
        notification.validate()?;
        let envelope = self.envelope(notification);
        debug!(
            server = %envelope.server_address,
            recipients = envelope.to.len(),
            attachments = envelope.attachments.len(),
            "delivering notification"
        );
        self.transport.deliver(envelope).await?;
        info!(subject = %notification.subject, "notification sent");
        Ok(())
    }

    /// Render `report` as HTML and send it to `to`.
    pub async fn send_report<R>(&self, report: &R, to: Vec<String>, subject: &str) -> Result<()>
    where
        R: Report + ?Sized,
    {
        let notification = Notification::new(to, subject, report.to_html());
        self.send(&notification).await
    }
}
