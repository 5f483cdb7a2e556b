use crate::domain::model::LeadRecord;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_key(&self) -> Option<&str>;
    fn search_endpoint(&self) -> &str;
    fn match_endpoint(&self) -> &str;
    fn output_path(&self) -> &str;
}

/// Where lead records come from: one outbound call per fetch.
#[async_trait]
pub trait LeadSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self) -> Result<Vec<LeadRecord>>;
}
