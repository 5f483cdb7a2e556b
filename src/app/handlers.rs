//! One function per user action. Each takes the session explicitly; fetches
//! may replace its table, everything else only reads it.

use crate::adapters::apollo::ApolloClient;
use crate::adapters::dashboard::DashboardClient;
use crate::adapters::webhook::{Destination, ForwardOutcome, WebhookForwarder};
use crate::app::pipelines::{EnrichPipeline, MatchRequest, SearchPipeline, SearchRequest};
use crate::core::dashboard::{summarize, DashboardFilter, DashboardSummary};
use crate::core::etl::{FetchOutcome, LeadEngine};
use crate::core::normalizer::{normalize, FixedSchema, NormalizeMode};
use crate::core::session::{LeadSession, TableKind};
use crate::domain::ports::Storage;
use crate::utils::error::{LeadError, Result};
use std::path::Path;

pub async fn fetch_search(
    session: &mut LeadSession,
    client: ApolloClient,
    request: &SearchRequest,
) -> Result<FetchOutcome> {
    let pipeline = SearchPipeline::from_request(client, request)?;
    LeadEngine::new(pipeline, NormalizeMode::Full, TableKind::Search)
        .run(session)
        .await
}

pub async fn fetch_enrichment(
    session: &mut LeadSession,
    client: ApolloClient,
    request: MatchRequest,
) -> Result<FetchOutcome> {
    let pipeline = EnrichPipeline::new(client, request)?;
    LeadEngine::new(
        pipeline,
        NormalizeMode::FixedSchema(FixedSchema::enrichment()),
        TableKind::Enrichment,
    )
    .run(session)
    .await
}

/// Writes the session table as CSV. Returns the path written.
pub async fn export_csv<S: Storage>(
    session: &LeadSession,
    storage: &S,
    file_name: Option<&str>,
) -> Result<String> {
    let (kind, table) = session.require_table()?;
    let file_name = file_name.unwrap_or_else(|| kind.export_file_name());
    let csv = table.to_csv()?;

    let path = storage.write_file(file_name, &csv).await?;
    tracing::info!("💾 Saved {} leads to {}", table.len(), path);
    Ok(path)
}

/// Forwards the session table with the session's intention.
pub async fn send_table(
    session: &LeadSession,
    forwarder: &WebhookForwarder,
    destination: Destination,
) -> Result<ForwardOutcome> {
    let (kind, table) = session.require_table()?;
    let csv = table.to_csv()?;
    let intention = Some(session.intention()).filter(|i| !i.trim().is_empty());

    forwarder
        .send(destination, csv, kind.upload_file_name(), intention)
        .await
}

/// Sends any local file to the generic upload webhook under its own name.
pub async fn upload_file<S: Storage>(
    storage: &S,
    forwarder: &WebhookForwarder,
    path: &str,
    intention: Option<&str>,
) -> Result<ForwardOutcome> {
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LeadError::validation(format!("'{}' is not a file path", path)))?
        .to_string();

    let bytes = storage.read_file(path).await?;
    tracing::info!("File ready: {} ({} bytes)", file_name, bytes.len());

    forwarder
        .send(Destination::Upload, bytes, &file_name, intention)
        .await
}

pub async fn load_dashboard(
    client: &DashboardClient,
    filter: &DashboardFilter,
) -> Result<DashboardSummary> {
    let rows = client.fetch_rows().await?;
    let table = normalize(&rows, &NormalizeMode::Full);
    Ok(summarize(&table, filter))
}
