//! Webhook-backed contact initiator
//!
//! POSTs each lead handoff to the external messaging automation. The
//! automation drives the WhatsApp qualification flow and reports back
//! through the qualification webhook.

use std::time::Duration;

use async_trait::async_trait;

use leadflow_config::ProspectingConfig;
use leadflow_core::{ContactInitiator, ContactRequest, Error, Result};

/// Contact initiator that POSTs to a configured webhook URL
pub struct WebhookContactInitiator {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookContactInitiator {
    /// Build from prospecting configuration
    ///
    /// An absent `webhook_url` produces an initiator that reports
    /// not-ready; the dispatcher rejects triggers before mutating leads.
    pub fn from_config(config: &ProspectingConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.webhook_timeout_seconds))
            .build()
            .unwrap_or_default();
        Self {
            client,
            url: config.webhook_url.clone(),
        }
    }

    /// Build with an explicit URL (tests, overrides)
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: Some(url.into()),
        }
    }
}

#[async_trait]
impl ContactInitiator for WebhookContactInitiator {
    async fn initiate(&self, request: &ContactRequest) -> Result<()> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| Error::UpstreamDelivery("contact webhook not configured".to_string()))?;

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::UpstreamDelivery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::UpstreamDelivery(format!(
                "contact webhook returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }

    fn is_ready(&self) -> bool {
        self.url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_initiator_is_not_ready() {
        let initiator = WebhookContactInitiator::from_config(&ProspectingConfig::default());
        assert!(!initiator.is_ready());
    }

    #[test]
    fn test_configured_initiator_is_ready() {
        let initiator = WebhookContactInitiator::with_url("http://localhost:5678/webhook");
        assert!(initiator.is_ready());
        assert_eq!(initiator.name(), "webhook");
    }
}
