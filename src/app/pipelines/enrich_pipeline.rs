use crate::adapters::apollo::ApolloClient;
use crate::domain::model::LeadRecord;
use crate::domain::ports::LeadSource;
use crate::utils::error::{LeadError, Result};
use crate::utils::validation::{validate_url, Validate};

/// People-match lookup. Every field is optional; empty ones are not sent.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub hashed_email: Option<String>,
    pub organization_name: Option<String>,
    pub domain: Option<String>,
    pub id: Option<String>,
    pub linkedin_url: Option<String>,
    pub reveal_personal_emails: bool,
    pub reveal_phone_number: bool,
    /// Where the API delivers phone numbers asynchronously.
    pub webhook_url: Option<String>,
}

impl Default for MatchRequest {
    fn default() -> Self {
        Self {
            first_name: None,
            last_name: None,
            name: None,
            email: None,
            hashed_email: None,
            organization_name: None,
            domain: None,
            id: None,
            linkedin_url: None,
            reveal_personal_emails: true,
            reveal_phone_number: false,
            webhook_url: None,
        }
    }
}

impl MatchRequest {
    pub fn linkedin(url: impl Into<String>) -> Self {
        Self {
            linkedin_url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Query parameters in API order, blanks dropped.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let fields = [
            ("first_name", self.first_name.clone()),
            ("last_name", self.last_name.clone()),
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("hashed_email", self.hashed_email.clone()),
            ("organization_name", self.organization_name.clone()),
            ("domain", self.domain.clone()),
            ("id", self.id.clone()),
            ("linkedin_url", self.linkedin_url.clone()),
            (
                "reveal_personal_emails",
                Some(self.reveal_personal_emails.to_string()),
            ),
            (
                "reveal_phone_number",
                Some(self.reveal_phone_number.to_string()),
            ),
            (
                "webhook_url",
                self.webhook_url.clone().filter(|_| self.reveal_phone_number),
            ),
        ];

        fields
            .into_iter()
            .filter_map(|(key, value)| {
                let value = value?.trim().to_string();
                (!value.is_empty()).then(|| (key.to_string(), value))
            })
            .collect()
    }
}

impl Validate for MatchRequest {
    fn validate(&self) -> Result<()> {
        if self.reveal_phone_number {
            match self.webhook_url.as_deref().map(str::trim) {
                Some(url) if !url.is_empty() => validate_url("webhook_url", url)?,
                _ => {
                    return Err(LeadError::validation(
                        "Webhook URL is required when Reveal Phone Number is enabled.",
                    ))
                }
            }
        }
        Ok(())
    }
}

/// People match as a lead source; one record at most, normalized against the
/// enrichment schema.
pub struct EnrichPipeline {
    client: ApolloClient,
    request: MatchRequest,
}

impl EnrichPipeline {
    pub fn new(client: ApolloClient, request: MatchRequest) -> Result<Self> {
        request.validate()?;
        Ok(Self { client, request })
    }
}

#[async_trait::async_trait]
impl LeadSource for EnrichPipeline {
    fn name(&self) -> &str {
        "people-match"
    }

    async fn fetch(&self) -> Result<Vec<LeadRecord>> {
        tracing::info!("Enriching lead...");
        let matched = self.client.match_person(&self.request.query_pairs()).await?;
        if matched.is_some() && self.request.reveal_phone_number {
            tracing::info!("📞 Phone numbers will be sent asynchronously to your webhook URL.");
        }
        Ok(matched.into_iter().collect())
    }
}
