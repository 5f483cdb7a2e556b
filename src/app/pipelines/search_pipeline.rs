use crate::adapters::apollo::ApolloClient;
use crate::core::translator::{extract_raw_params, translate};
use crate::domain::model::{ApiParameterSet, LeadRecord};
use crate::domain::ports::LeadSource;
use crate::utils::error::{LeadError, Result};
use crate::utils::validation::{validate_range, validate_required_field, Validate};
use std::num::NonZeroU32;

pub const MAX_PAGE: u32 = 500;
pub const MAX_PER_PAGE: u32 = 100;

/// Inputs of a people search, as typed by the user.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub ui_url: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl SearchRequest {
    pub fn new(ui_url: impl Into<String>, page: u32, per_page: u32) -> Self {
        Self {
            ui_url: Some(ui_url.into()),
            page,
            per_page,
        }
    }

    /// Translated API parameters for the pasted URL.
    pub fn api_params(&self) -> Result<ApiParameterSet> {
        self.validate()?;
        let ui_url = validate_required_field("the Apollo search URL", self.ui_url.as_deref())?;
        let raw = extract_raw_params(ui_url)?;
        tracing::debug!("Parsed {} UI parameters from URL", raw.len());

        let page = NonZeroU32::new(self.page).ok_or_else(|| LeadError::validation("page must be at least 1"))?;
        let per_page = NonZeroU32::new(self.per_page)
            .ok_or_else(|| LeadError::validation("per_page must be at least 1"))?;
        Ok(translate(&raw, page, per_page))
    }
}

impl Validate for SearchRequest {
    fn validate(&self) -> Result<()> {
        validate_required_field("the Apollo search URL", self.ui_url.as_deref())?;
        validate_range("page", self.page, 1, MAX_PAGE)?;
        validate_range("per_page", self.per_page, 1, MAX_PER_PAGE)?;
        Ok(())
    }
}

/// People search as a lead source; normalized in full mode.
pub struct SearchPipeline {
    client: ApolloClient,
    params: ApiParameterSet,
}

impl SearchPipeline {
    pub fn new(client: ApolloClient, params: ApiParameterSet) -> Self {
        Self { client, params }
    }

    pub fn from_request(client: ApolloClient, request: &SearchRequest) -> Result<Self> {
        Ok(Self::new(client, request.api_params()?))
    }
}

#[async_trait::async_trait]
impl LeadSource for SearchPipeline {
    fn name(&self) -> &str {
        "people-search"
    }

    async fn fetch(&self) -> Result<Vec<LeadRecord>> {
        tracing::info!("Fetching results from Apollo.io...");
        self.client.search_people(&self.params).await
    }
}
