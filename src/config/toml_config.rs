use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LeadError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.apollo.io/api/v1/mixed_people/search";
pub const DEFAULT_MATCH_ENDPOINT: &str = "https://api.apollo.io/api/v1/people/match";
pub const DEFAULT_LIVE_WEBHOOK: &str = "https://bizmaxus.app.n8n.cloud/webhook/csv";
pub const DEFAULT_TEST_WEBHOOK: &str = "https://bizmaxus.app.n8n.cloud/webhook-test/csv";
pub const DEFAULT_CAMPAIGN_WEBHOOK: &str = "https://bizmaxus.app.n8n.cloud/webhook/salesnav";
pub const DEFAULT_UPLOAD_WEBHOOK: &str = "https://bizmaxus.app.n8n.cloud/webhook/csv";
pub const DEFAULT_FULL_LIST_ENDPOINT: &str = "https://bizmaxus.app.n8n.cloud/webhook/full-list";
pub const DEFAULT_WEBHOOK_TIMEOUT_SECONDS: u64 = 15;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadConfig {
    pub apollo: ApolloConfig,
    pub webhooks: WebhooksConfig,
    pub dashboard: DashboardConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApolloConfig {
    pub api_key: Option<String>,
    pub search_endpoint: String,
    pub match_endpoint: String,
}

impl Default for ApolloConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            match_endpoint: DEFAULT_MATCH_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhooksConfig {
    pub live: String,
    pub test: String,
    pub campaign: String,
    pub upload: String,
    pub timeout_seconds: u64,
}

impl Default for WebhooksConfig {
    fn default() -> Self {
        Self {
            live: DEFAULT_LIVE_WEBHOOK.to_string(),
            test: DEFAULT_TEST_WEBHOOK.to_string(),
            campaign: DEFAULT_CAMPAIGN_WEBHOOK.to_string(),
            upload: DEFAULT_UPLOAD_WEBHOOK.to_string(),
            timeout_seconds: DEFAULT_WEBHOOK_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub full_list_endpoint: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            full_list_endpoint: DEFAULT_FULL_LIST_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_path: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
        }
    }
}

impl LeadConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LeadError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LeadError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${APOLLO_API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").expect("static pattern");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// Blank or still-unsubstituted keys count as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.apollo
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.starts_with("${"))
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("apollo.search_endpoint", &self.apollo.search_endpoint)?;
        validation::validate_url("apollo.match_endpoint", &self.apollo.match_endpoint)?;
        validation::validate_url("webhooks.live", &self.webhooks.live)?;
        validation::validate_url("webhooks.test", &self.webhooks.test)?;
        validation::validate_url("webhooks.campaign", &self.webhooks.campaign)?;
        validation::validate_url("webhooks.upload", &self.webhooks.upload)?;
        validation::validate_url("dashboard.full_list_endpoint", &self.dashboard.full_list_endpoint)?;
        validation::validate_path("export.output_path", &self.export.output_path)?;
        validation::validate_range("webhooks.timeout_seconds", self.webhooks.timeout_seconds, 1, 300)?;
        Ok(())
    }
}

impl ConfigProvider for LeadConfig {
    fn api_key(&self) -> Option<&str> {
        LeadConfig::api_key(self)
    }

    fn search_endpoint(&self) -> &str {
        &self.apollo.search_endpoint
    }

    fn match_endpoint(&self) -> &str {
        &self.apollo.match_endpoint
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }
}

impl Validate for LeadConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = LeadConfig::from_toml_str("").unwrap();

        assert_eq!(config.apollo.search_endpoint, DEFAULT_SEARCH_ENDPOINT);
        assert_eq!(config.webhooks, WebhooksConfig::default());
        assert_eq!(config.webhooks.timeout_seconds, 15);
        assert!(config.api_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let toml_content = r#"
[apollo]
api_key = "abc123"
search_endpoint = "http://localhost:9000/search"

[webhooks]
test = "http://localhost:9000/test"
timeout_seconds = 5
"#;

        let config = LeadConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_key(), Some("abc123"));
        assert_eq!(config.search_endpoint(), "http://localhost:9000/search");
        assert_eq!(config.match_endpoint(), DEFAULT_MATCH_ENDPOINT);
        assert_eq!(config.webhooks.test, "http://localhost:9000/test");
        assert_eq!(config.webhooks.live, DEFAULT_LIVE_WEBHOOK);
        assert_eq!(config.webhooks.timeout_seconds, 5);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LEAD_MACHINE_TEST_KEY", "from-env");

        let config = LeadConfig::from_toml_str(
            r#"
[apollo]
api_key = "${LEAD_MACHINE_TEST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.api_key(), Some("from-env"));

        std::env::remove_var("LEAD_MACHINE_TEST_KEY");
    }

    #[test]
    fn test_unset_env_var_is_not_a_key() {
        let config = LeadConfig::from_toml_str(
            r#"
[apollo]
api_key = "${LEAD_MACHINE_SURELY_UNSET_VAR}"
"#,
        )
        .unwrap();
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_config_validation() {
        let config = LeadConfig::from_toml_str(
            r#"
[webhooks]
live = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = LeadConfig::from_toml_str("[webhooks]\ntimeout_seconds = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = LeadConfig::from_toml_str("[apollo\n").unwrap_err();
        assert!(matches!(err, LeadError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[export]\noutput_path = \"./leads\"\n")
            .unwrap();

        let config = LeadConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./leads");
    }
}
