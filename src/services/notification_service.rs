use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::offer::Offer;
use crate::utils::crypto::sign_payload;

pub const SIGNATURE_HEADER: &str = "X-Signature-256";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipient: String,
    pub template: String,
    pub status: String,
    pub application_id: Uuid,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> Result<()>;
}

pub fn template_for(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Submitted => "application_received",
        ApplicationStatus::Screening => "application_screening",
        ApplicationStatus::Reviewed => "application_reviewed",
        ApplicationStatus::Interview => "interview_scheduled",
        ApplicationStatus::Interviewed => "interview_completed",
        ApplicationStatus::Completed => "process_completed",
        ApplicationStatus::Offered => "offer_extended",
        ApplicationStatus::Hired => "welcome_aboard",
        ApplicationStatus::Rejected => "application_rejected",
        ApplicationStatus::Withdrawn => "application_withdrawn",
    }
}

/// Records notifications in the log only.
#[derive(Debug, Default, Clone)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        tracing::info!(
            recipient = %notification.recipient,
            template = %notification.template,
            status = %notification.status,
            application_id = %notification.application_id,
            "Notification recorded"
        );
        Ok(())
    }
}

/// Posts each notification as JSON to a fixed URL, signed when a secret is configured.
#[derive(Clone)]
pub struct WebhookSink {
    client: Client,
    target_url: String,
    secret: Option<String>,
}

impl WebhookSink {
    pub fn new(target_url: String, secret: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            target_url,
            secret,
        })
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        let body = serde_json::to_vec(notification)?;
        let mut request = self
            .client
            .post(&self.target_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(secret) = &self.secret {
            let signature = sign_payload(secret, &body)?;
            request = request.header(SIGNATURE_HEADER, format!("sha256={}", signature));
        }

        let resp = request.body(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Internal(format!(
                "notification webhook returned {}: {}",
                status, text
            )));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct NotificationService {
    sink: Arc<dyn NotificationSink>,
}

impl NotificationService {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Never fails: delivery errors are logged and dropped.
    pub async fn application_status_changed(&self, application: &Application) {
        let notification = Notification {
            recipient: application.candidate_email.clone(),
            template: template_for(application.status).to_string(),
            status: application.status.as_str().to_string(),
            application_id: application.id,
        };
        self.dispatch(notification).await;
    }

    pub async fn offer_sent(&self, offer: &Offer) {
        let notification = Notification {
            recipient: offer.candidate_email.clone(),
            template: "offer_sent".to_string(),
            status: ApplicationStatus::Offered.as_str().to_string(),
            application_id: offer.application_id,
        };
        self.dispatch(notification).await;
    }

    async fn dispatch(&self, notification: Notification) {
        if let Err(e) = self.sink.deliver(&notification).await {
            tracing::warn!(
                error = %e,
                recipient = %notification.recipient,
                template = %notification.template,
                "Notification delivery failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn application(status: ApplicationStatus) -> Application {
        Application {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            candidate_name: "Ada".into(),
            candidate_email: "ada@example.com".into(),
            candidate_phone: None,
            cover_letter: "Hello".into(),
            resume_path: None,
            status,
            notes: None,
            applied_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn status_change_is_rendered_with_template() {
        let mut sink = MockNotificationSink::new();
        sink.expect_deliver()
            .withf(|n| {
                n.recipient == "ada@example.com"
                    && n.template == "interview_scheduled"
                    && n.status == "INTERVIEW"
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = NotificationService::new(Arc::new(sink));
        service
            .application_status_changed(&application(ApplicationStatus::Interview))
            .await;
    }

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let mut sink = MockNotificationSink::new();
        sink.expect_deliver()
            .times(1)
            .returning(|_| Err(Error::Internal("smtp down".into())));

        let service = NotificationService::new(Arc::new(sink));
        service
            .application_status_changed(&application(ApplicationStatus::Rejected))
            .await;
    }

    #[test]
    fn every_status_has_a_template() {
        let mut seen = std::collections::HashSet::new();
        for status in ApplicationStatus::ALL {
            assert!(seen.insert(template_for(status)));
        }
    }
}
