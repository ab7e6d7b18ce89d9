//! Best-effort notification delivery for completed submissions.
//!
//! The [`Notify`] trait is the seam the submission workflow calls through;
//! [`WebhookNotifier`] is the production implementation, POSTing a JSON
//! payload to a configured webhook. Notification failure is never fatal:
//! implementations return `false` instead of propagating errors.

pub mod summary;

use brandgate_shared::{BrandGateError, NotifierConfig, Result};

/// Deliver a notification for a completed submission.
pub trait Notify {
    /// Send `summary` to `email`. Returns `true` on confirmed delivery;
    /// must not fail the caller.
    fn notify(&self, summary: &str, email: &str) -> impl Future<Output = bool> + Send;
}

/// Webhook-backed notifier. The receiving endpoint fans the payload out as
/// an email to the requestor.
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl WebhookNotifier {
    /// Build a notifier from config. Fails only on client construction;
    /// delivery problems surface as `false` from [`Notify::notify`].
    pub fn new(config: &NotifierConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("BrandGate/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BrandGateError::Network(format!("client build: {e}")))?;

        Ok(Self {
            client,
            webhook_url: config.webhook_url.clone(),
        })
    }
}

impl Notify for WebhookNotifier {
    async fn notify(&self, summary: &str, email: &str) -> bool {
        let cleaned = summary::prepare(summary);

        let payload = serde_json::json!({
            "email": email,
            "query_value": cleaned,
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await;

        match response {
            // The webhook answers 200 or 202 depending on queueing mode
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(email, "notification delivered");
                true
            }
            Ok(resp) => {
                tracing::warn!(email, status = %resp.status(), "notification rejected");
                false
            }
            Err(e) => {
                tracing::warn!(email, error = %e, "notification delivery failed");
                false
            }
        }
    }
}
