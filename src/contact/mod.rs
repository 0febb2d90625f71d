//! Contact form submissions
//!
//! A [`Mailer`] receives a ready-to-send [`Envelope`] and reports success
//! or failure. [`SmtpMailer`] relays it to the configured SMTP server;
//! [`LogMailer`] stands in when no server is configured.

use std::sync::Arc;

use anyhow::{Context, Result};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::Deserialize;

use crate::config::SmtpConfig;

/// Fields posted by the contact form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub company: String,
    pub contact: String,
    pub subject: String,
    pub message: String,
}

/// A formatted message and its addressing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from: String,
    pub to: String,
    pub subject: String,
    /// Full message text, headers included
    pub body: String,
}

impl ContactForm {
    /// Build the message sent to the site owner
    pub fn to_envelope(&self, site_title: &str, smtp: &SmtpConfig) -> Envelope {
        let subject = format!("{} - {}", site_title, self.subject);
        let body = format!(
            "From: {from}\nTo: {to}\nSubject: {subject}\n\nName: {name}\nCompany: {company}\nContact: {contact}\nSubject: {form_subject}\n\n{message}",
            from = smtp.from,
            to = smtp.to,
            subject = subject,
            name = self.name,
            company = self.company,
            contact = self.contact,
            form_subject = self.subject,
            message = self.message,
        );

        Envelope {
            from: smtp.from.clone(),
            to: smtp.to.clone(),
            subject,
            body,
        }
    }
}

impl Envelope {
    /// Message text without the leading header block
    pub fn text(&self) -> &str {
        self.body
            .split_once("\n\n")
            .map_or(self.body.as_str(), |(_, text)| text)
    }
}

/// Outbound mail transport
pub trait Mailer: Send + Sync {
    fn send(&self, envelope: &Envelope) -> Result<()>;
}

/// Mailer that writes messages to the log instead of sending them
#[derive(Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, envelope: &Envelope) -> Result<()> {
        if envelope.to.is_empty() {
            anyhow::bail!("no recipient configured for contact messages");
        }
        tracing::info!(
            to = %envelope.to,
            subject = %envelope.subject,
            "Contact message:\n{}",
            envelope.body
        );
        Ok(())
    }
}

/// Mailer relaying through an SMTP server with STARTTLS
pub struct SmtpMailer {
    host: String,
    port: u16,
    user: Option<String>,
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Build a mailer from the `smtp` section of the site configuration
    ///
    /// Returns `None` when no recipient or host is configured. No connection
    /// is made until the first message is sent.
    pub fn from_config(smtp: &SmtpConfig) -> Result<Option<Self>> {
        if smtp.to.is_empty() || smtp.host.is_empty() {
            return Ok(None);
        }

        let mut builder = SmtpTransport::starttls_relay(&smtp.host)
            .with_context(|| format!("invalid SMTP host {}", smtp.host))?
            .port(smtp.port);

        let user = if smtp.user.is_empty() {
            None
        } else {
            builder = builder.credentials(Credentials::new(
                smtp.user.clone(),
                smtp.password.clone(),
            ));
            Some(smtp.user.clone())
        };

        Ok(Some(Self {
            host: smtp.host.clone(),
            port: smtp.port,
            user,
            transport: builder.build(),
        }))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Login used to authenticate, if any
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    fn message(envelope: &Envelope) -> Result<Message> {
        let message = Message::builder()
            .from(envelope.from.parse::<Mailbox>().context("invalid sender address")?)
            .to(envelope.to.parse::<Mailbox>().context("invalid recipient address")?)
            .subject(envelope.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(envelope.text().to_string())?;
        Ok(message)
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, envelope: &Envelope) -> Result<()> {
        let message = Self::message(envelope)?;
        self.transport
            .send(&message)
            .with_context(|| {
                format!("SMTP delivery through {}:{} failed", self.host, self.port)
            })?;
        tracing::info!(to = %envelope.to, "Contact message sent");
        Ok(())
    }
}

/// The mailer for a site: SMTP when configured, the log otherwise
pub fn mailer_for(smtp: &SmtpConfig) -> Result<Arc<dyn Mailer>> {
    match SmtpMailer::from_config(smtp)? {
        Some(mailer) => {
            tracing::info!("Contact messages go through {}:{}", mailer.host(), mailer.port());
            Ok(Arc::new(mailer))
        }
        None => {
            tracing::warn!("No SMTP recipient configured, contact messages are only logged");
            Ok(Arc::new(LogMailer))
        }
    }
}
