use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use sqlx::PgPool;
use tokio_util::task::TaskTracker;

use crate::config::SmtpConfig;
use crate::error::{Error, Result};
use crate::models::application::ApplicationStatus;
use crate::models::email_notification::{EmailNotification, NotificationType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Outbound mail delivery. The SMTP implementation is [`SmtpMailer`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> std::result::Result<(), String>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let builder = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| Error::Config(format!("Invalid SMTP host {}: {}", config.host, e)))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| Error::Config(format!("Invalid EMAIL_FROM {}: {}", config.from, e)))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> std::result::Result<(), String> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| format!("invalid recipient: {}", e))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| format!("failed to build message: {}", e))?;
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed,
    NotConfigured,
}

/// Best-effort transactional email. Nothing here returns an error to the caller.
#[derive(Clone)]
pub struct EmailService {
    pool: PgPool,
    transport: Option<Arc<dyn MailTransport>>,
    company_name: String,
    in_flight: TaskTracker,
}

impl EmailService {
    pub fn new(
        pool: PgPool,
        transport: Option<Arc<dyn MailTransport>>,
        company_name: String,
    ) -> Self {
        Self {
            pool,
            transport,
            company_name,
            in_flight: TaskTracker::new(),
        }
    }

    /// Builds the SMTP transport when configured; a bad SMTP config disables email.
    pub fn from_config(pool: PgPool, smtp: Option<&SmtpConfig>, company_name: String) -> Self {
        let transport = match smtp.map(SmtpMailer::new) {
            Some(Ok(mailer)) => Some(Arc::new(mailer) as Arc<dyn MailTransport>),
            Some(Err(err)) => {
                tracing::warn!(error = %err, "SMTP transport unavailable; email disabled");
                None
            }
            None => None,
        };
        Self::new(pool, transport, company_name)
    }

    /// Sends in the background; [`EmailService::drain`] waits for it on shutdown.
    pub fn dispatch_application_received(&self, to: String, job_title: String) {
        let service = self.clone();
        self.in_flight.spawn(async move {
            service.send_application_received(&to, &job_title).await;
        });
    }

    pub fn dispatch_status_update(&self, to: String, job_title: String, status: ApplicationStatus) {
        let service = self.clone();
        self.in_flight.spawn(async move {
            service.send_status_update(&to, &job_title, status).await;
        });
    }

    /// Waits up to `timeout` for dispatched emails. Returns `false` if some were still pending.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.in_flight.close();
        let finished = tokio::time::timeout(timeout, self.in_flight.wait())
            .await
            .is_ok();
        if !finished {
            tracing::warn!(
                pending = self.in_flight.len(),
                "shutdown timed out with notification emails still in flight"
            );
        }
        finished
    }

    pub async fn send_application_received(&self, to: &str, job_title: &str) -> DeliveryOutcome {
        let email = application_received_email(&self.company_name, to, job_title);
        self.deliver(NotificationType::ApplicationReceived, email)
            .await
    }

    pub async fn send_status_update(
        &self,
        to: &str,
        job_title: &str,
        status: ApplicationStatus,
    ) -> DeliveryOutcome {
        let email = status_update_email(&self.company_name, to, job_title, status);
        self.deliver(NotificationType::StatusUpdate, email).await
    }

    async fn deliver(&self, kind: NotificationType, email: OutgoingEmail) -> DeliveryOutcome {
        let Some(transport) = &self.transport else {
            tracing::warn!(to = %email.to, "email service not configured; skipping send");
            return DeliveryOutcome::NotConfigured;
        };

        let outcome = match transport.send(&email).await {
            Ok(()) => {
                tracing::info!(to = %email.to, kind = kind.as_str(), "email sent");
                DeliveryOutcome::Sent
            }
            Err(err) => {
                tracing::error!(to = %email.to, kind = kind.as_str(), error = %err, "email send failed");
                DeliveryOutcome::Failed
            }
        };

        if let Err(err) = self.record(kind, &email, outcome).await {
            tracing::error!(error = ?err, "failed to record email notification");
        }
        outcome
    }

    async fn record(
        &self,
        kind: NotificationType,
        email: &OutgoingEmail,
        outcome: DeliveryOutcome,
    ) -> Result<EmailNotification> {
        let sent = outcome == DeliveryOutcome::Sent;
        let row = sqlx::query_as::<_, EmailNotification>(
            r#"
            INSERT INTO email_notifications
                (recipient_email, notification_type, subject, body, status, sent_at)
            VALUES ($1, $2, $3, $4, $5, CASE WHEN $6 THEN NOW() ELSE NULL END)
            RETURNING id, recipient_email, notification_type, subject, body, status, sent_at, created_at
            "#,
        )
        .bind(&email.to)
        .bind(kind.as_str())
        .bind(&email.subject)
        .bind(&email.html)
        .bind(if sent { "sent" } else { "failed" })
        .bind(sent)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn wrap(heading: &str, paragraphs: &[String], company: &str) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("      <p>{}</p>\n", p))
        .collect();
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
      <h2>{heading}</h2>
{body}      <br>
      <p>Best regards,<br>{company} HR Team</p>
    </div>"#,
        heading = heading,
        body = body,
        company = escape_html(company),
    )
}

pub fn application_received_email(company: &str, to: &str, job_title: &str) -> OutgoingEmail {
    let title = escape_html(job_title);
    let html = wrap(
        "Application Received",
        &[
            format!(
                "Thank you for applying to <strong>{}</strong> at {}.",
                title,
                escape_html(company)
            ),
            "We have received your application and our team will review it shortly.".to_string(),
            "You will be notified of any updates regarding your application.".to_string(),
        ],
        company,
    );
    OutgoingEmail {
        to: to.to_string(),
        subject: format!("Application Received - {}", job_title),
        html,
    }
}

pub fn status_message(status: ApplicationStatus, company: &str) -> String {
    match status {
        ApplicationStatus::Shortlisted => {
            "Congratulations! Your application has been shortlisted.".to_string()
        }
        ApplicationStatus::Rejected => "Thank you for your interest. Unfortunately, we will not be moving forward with your application.".to_string(),
        ApplicationStatus::InterviewScheduled => {
            "Great news! We would like to schedule an interview with you.".to_string()
        }
        ApplicationStatus::OfferExtended => {
            "Congratulations! We are pleased to extend an offer to you.".to_string()
        }
        ApplicationStatus::Hired => format!(
            "Welcome to {}! We are excited to have you join our team.",
            escape_html(company)
        ),
        ApplicationStatus::Pending => "Your application status has been updated.".to_string(),
    }
}

pub fn status_update_email(
    company: &str,
    to: &str,
    job_title: &str,
    status: ApplicationStatus,
) -> OutgoingEmail {
    let html = wrap(
        "Application Status Update",
        &[
            format!(
                "Regarding your application for <strong>{}</strong>:",
                escape_html(job_title)
            ),
            status_message(status, company),
            "Please log in to your account to view more details.".to_string(),
        ],
        company,
    );
    OutgoingEmail {
        to: to.to_string(),
        subject: format!("Application Update - {}", job_title),
        html,
    }
}
