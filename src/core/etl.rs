use crate::core::normalizer::{normalize, NormalizeMode};
use crate::core::session::{LeadSession, TableKind};
use crate::domain::ports::LeadSource;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Table stored in the session.
    Fetched { rows: usize, columns: usize },
    /// Zero records came back; the session was left as it was.
    Empty,
}

/// Fetch → normalize → store, shared by every entry point.
pub struct LeadEngine<L: LeadSource> {
    source: L,
    mode: NormalizeMode,
    kind: TableKind,
}

impl<L: LeadSource> LeadEngine<L> {
    pub fn new(source: L, mode: NormalizeMode, kind: TableKind) -> Self {
        Self { source, mode, kind }
    }

    pub async fn run(&self, session: &mut LeadSession) -> Result<FetchOutcome> {
        tracing::info!("📡 {}: fetching leads", self.source.name());
        let records = self.source.fetch().await?;
        tracing::info!("📥 {}: received {} records", self.source.name(), records.len());

        if records.is_empty() {
            tracing::warn!("⚠️ {}: no people found for this query", self.source.name());
            return Ok(FetchOutcome::Empty);
        }

        let table = normalize(&records, &self.mode);
        if table.columns().is_empty() {
            tracing::warn!(
                "⚠️ {}: {} records carried no fields, nothing to keep",
                self.source.name(),
                records.len()
            );
            return Ok(FetchOutcome::Empty);
        }

        let outcome = FetchOutcome::Fetched {
            rows: table.len(),
            columns: table.columns().len(),
        };
        session.replace(self.kind, table);

        tracing::info!("✅ {}: {:?}", self.source.name(), outcome);
        Ok(outcome)
    }
}
