use crate::domain::model::LeadTable;
use crate::utils::error::{LeadError, Result};

/// Which action produced the table held by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Search,
    Enrichment,
}

impl TableKind {
    /// Name used for downloads.
    pub fn export_file_name(&self) -> &'static str {
        match self {
            TableKind::Search => "apollo_leads_full.csv",
            TableKind::Enrichment => "enriched_lead.csv",
        }
    }

    /// Name used when forwarding to a webhook.
    pub fn upload_file_name(&self) -> &'static str {
        match self {
            TableKind::Search => "apollo_full_leads.csv",
            TableKind::Enrichment => "enriched_lead.csv",
        }
    }
}

/// State shared by the actions of one user session.
///
/// Starts empty. Each successful fetch replaces the table wholesale; export
/// and send actions only read it.
#[derive(Debug, Default)]
pub struct LeadSession {
    current: Option<(TableKind, LeadTable)>,
    intention: String,
}

impl LeadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a new table, returning the one it replaced.
    pub fn replace(&mut self, kind: TableKind, table: LeadTable) -> Option<LeadTable> {
        tracing::debug!("Session table replaced: {:?}, {} rows", kind, table.len());
        self.current.replace((kind, table)).map(|(_, old)| old)
    }

    pub fn table(&self) -> Option<&LeadTable> {
        self.current.as_ref().map(|(_, table)| table)
    }

    pub fn kind(&self) -> Option<TableKind> {
        self.current.as_ref().map(|(kind, _)| *kind)
    }

    pub fn has_table(&self) -> bool {
        self.current.is_some()
    }

    pub fn require_table(&self) -> Result<(TableKind, &LeadTable)> {
        self.current
            .as_ref()
            .map(|(kind, table)| (*kind, table))
            .ok_or(LeadError::NoSessionData)
    }

    pub fn csv_bytes(&self) -> Result<Vec<u8>> {
        let (_, table) = self.require_table()?;
        table.to_csv()
    }

    pub fn intention(&self) -> &str {
        &self.intention
    }

    pub fn set_intention(&mut self, intention: impl Into<String>) {
        self.intention = intention.into();
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.intention.clear();
    }
}
