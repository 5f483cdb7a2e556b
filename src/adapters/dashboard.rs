use crate::adapters::apollo::ensure_success;
use crate::domain::model::LeadRecord;
use crate::utils::error::{LeadError, Result};
use reqwest::Client;
use serde_json::Value;

/// Read-only client for the reporting endpoints.
pub struct DashboardClient {
    client: Client,
    endpoint: String,
}

impl DashboardClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// GETs the endpoint and returns its JSON array of flat rows.
    pub async fn fetch_rows(&self) -> Result<Vec<LeadRecord>> {
        tracing::debug!("Fetching dashboard rows from: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;
        let body: Value = ensure_success(response).await?.json().await?;

        match body {
            Value::Array(rows) => {
                tracing::info!("📊 Loaded {} dashboard rows", rows.len());
                Ok(rows)
            }
            other => Err(LeadError::UnexpectedResponse {
                message: format!("expected a JSON array of rows, got {}", json_kind(&other)),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
