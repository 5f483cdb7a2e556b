use crate::core::translator::build_search_url;
use crate::domain::model::{ApiParameterSet, LeadRecord};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LeadError, Result};
use crate::utils::validation::validate_required_field;
use reqwest::{Client, Response};
use serde_json::Value;
use url::Url;

/// Top-level key of the people-search response holding the lead records.
pub const PEOPLE_KEY: &str = "people";

/// Thin client over the people-search and people-match endpoints.
#[derive(Clone)]
pub struct ApolloClient {
    client: Client,
    api_key: String,
    search_endpoint: String,
    match_endpoint: String,
}

impl std::fmt::Debug for ApolloClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApolloClient")
            .field("search_endpoint", &self.search_endpoint)
            .field("match_endpoint", &self.match_endpoint)
            .finish_non_exhaustive()
    }
}

impl ApolloClient {
    pub fn new(
        api_key: impl Into<String>,
        search_endpoint: impl Into<String>,
        match_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            search_endpoint: search_endpoint.into(),
            match_endpoint: match_endpoint.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let api_key = validate_required_field("your Apollo API key", config.api_key())?;
        Ok(Self::new(
            api_key,
            config.search_endpoint(),
            config.match_endpoint(),
        ))
    }

    pub fn search_url(&self, params: &ApiParameterSet) -> Result<Url> {
        build_search_url(&self.search_endpoint, params)
    }

    /// POSTs the search with the parameters in the query string and an empty
    /// JSON body. A response without a `people` array yields no records.
    pub async fn search_people(&self, params: &ApiParameterSet) -> Result<Vec<LeadRecord>> {
        let url = self.search_url(params)?;
        tracing::debug!("Making search request to: {}", url);

        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({}))
            .send()
            .await?;
        tracing::debug!("Search response status: {}", response.status());

        let mut body: Value = ensure_success(response).await?.json().await?;

        if let Some(pagination) = body.get("pagination") {
            tracing::debug!("Search pagination: {}", pagination);
        }

        match body.get_mut(PEOPLE_KEY).map(Value::take) {
            Some(Value::Array(people)) => Ok(people),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(LeadError::UnexpectedResponse {
                message: format!("'{}' is not an array: {}", PEOPLE_KEY, other),
            }),
        }
    }

    /// POSTs a people-match with every parameter in the query string.
    /// Returns `None` when the API answers with an empty body, `null`, `{}` or `[]`.
    pub async fn match_person(&self, query: &[(String, String)]) -> Result<Option<LeadRecord>> {
        tracing::debug!(
            "Making match request to: {} ({} parameters)",
            self.match_endpoint,
            query.len()
        );

        let response = self
            .client
            .post(&self.match_endpoint)
            .header("accept", "application/json")
            .header("Cache-Control", "no-cache")
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .query(query)
            .send()
            .await?;
        tracing::debug!("Match response status: {}", response.status());

        let body = ensure_success(response).await?.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let data: Value = serde_json::from_str(&body)?;
        Ok(match data {
            Value::Null => None,
            Value::Object(ref map) if map.is_empty() => None,
            Value::Array(ref items) if items.is_empty() => None,
            other => Some(other),
        })
    }
}

/// Turns a non-2xx response into an upstream error carrying status and body.
pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!("❌ API Error {}: {}", status.as_u16(), body);
    Err(LeadError::UpstreamError {
        status: status.as_u16(),
        body,
    })
}
