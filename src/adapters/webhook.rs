use crate::config::toml_config::WebhooksConfig;
use crate::utils::error::{LeadError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "data";
/// Multipart field carrying the free-text intention.
pub const INTENTION_FIELD: &str = "intention";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Destination {
    /// Live lead ingestion.
    Live,
    /// Test lead ingestion.
    Test,
    /// Add enriched leads to the campaign.
    Campaign,
    /// Generic binary upload.
    Upload,
}

impl Destination {
    /// Live and test ingestion refuse uploads without an intention.
    pub fn requires_intention(&self) -> bool {
        matches!(self, Destination::Live | Destination::Test)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Destination::Live => "Live",
            Destination::Test => "Test",
            Destination::Campaign => "Campaign",
            Destination::Upload => "Webhook",
        }
    }
}

/// Result of a forward. Transport and HTTP failures land here, not in `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardOutcome {
    pub success: bool,
    pub status: Option<u16>,
    pub message: String,
}

pub struct WebhookForwarder {
    client: Client,
    webhooks: WebhooksConfig,
}

impl WebhookForwarder {
    pub fn new(webhooks: WebhooksConfig) -> Self {
        Self {
            client: Client::new(),
            webhooks,
        }
    }

    pub fn url_for(&self, destination: Destination) -> &str {
        match destination {
            Destination::Live => &self.webhooks.live,
            Destination::Test => &self.webhooks.test,
            Destination::Campaign => &self.webhooks.campaign,
            Destination::Upload => &self.webhooks.upload,
        }
    }

    /// Uploads `payload` as `multipart/form-data`.
    ///
    /// Returns `Err` only when the inputs are invalid and nothing was sent.
    pub async fn send(
        &self,
        destination: Destination,
        payload: Vec<u8>,
        file_name: &str,
        intention: Option<&str>,
    ) -> Result<ForwardOutcome> {
        let intention = intention.map(str::trim).filter(|i| !i.is_empty());
        if destination.requires_intention() && intention.is_none() {
            return Err(LeadError::validation(
                "⚠ Please enter an intention before sending.",
            ));
        }

        let url = self.url_for(destination);
        tracing::info!(
            "📤 Sending {} ({} bytes) to {} webhook",
            file_name,
            payload.len(),
            destination.label()
        );

        let part = Part::bytes(payload)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")?;
        let mut form = Form::new().part(FILE_FIELD, part);
        if let Some(intention) = intention {
            form = form.text(INTENTION_FIELD, intention.to_string());
        }

        let result = self
            .client
            .post(url)
            .multipart(form)
            .timeout(Duration::from_secs(self.webhooks.timeout_seconds))
            .send()
            .await;

        let outcome = match result {
            Ok(response) => {
                let status = response.status().as_u16();
                response_outcome(status, response.text().await)
            }
            Err(e) => ForwardOutcome {
                success: false,
                status: None,
                message: e.to_string(),
            },
        };

        if outcome.success {
            tracing::info!("✅ Sent to {}!", destination.label());
        } else {
            tracing::warn!("❌ {} webhook failed: {}", destination.label(), outcome.message);
        }
        Ok(outcome)
    }
}

/// Outcome for a webhook that answered. An unreadable body fails the
/// outcome even on a 2xx status.
fn response_outcome<E: std::fmt::Display>(
    status: u16,
    body: std::result::Result<String, E>,
) -> ForwardOutcome {
    let success = (200..300).contains(&status);
    match body {
        Ok(body) if success => ForwardOutcome {
            success: true,
            status: Some(status),
            message: body,
        },
        Ok(body) => ForwardOutcome {
            success: false,
            status: Some(status),
            message: format!("HTTP {}: {}", status, body),
        },
        Err(e) => ForwardOutcome {
            success: false,
            status: Some(status),
            message: format!("HTTP {}: failed to read response body: {}", status, e),
        },
    }
}
