//! Nested lead records → flat [`LeadTable`].

use crate::domain::model::{LeadRecord, LeadTable};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const PATH_SEPARATOR: char = '.';

/// People-match response paths → caller-facing column names. The right-hand
/// side, in order, is also the enrichment column schema.
pub static ENRICHMENT_RENAMES: &[(&str, &str)] = &[
    ("person.id", "id"),
    ("person.first_name", "first_name"),
    ("person.last_name", "last_name"),
    ("person.name", "name"),
    ("person.linkedin_url", "linkedin_url"),
    ("person.title", "title"),
    ("person.email_status", "email_status"),
    ("person.photo_url", "photo_url"),
    ("person.twitter_url", "twitter_url"),
    ("person.github_url", "github_url"),
    ("person.facebook_url", "facebook_url"),
    ("person.extrapolated_email_confidence", "extrapolated_email_confidence"),
    ("person.headline", "headline"),
    ("person.email", "email"),
    ("person.organization_id", "organization_id"),
    ("person.employment_history", "employment_history"),
    ("person.state", "state"),
    ("person.city", "city"),
    ("person.country", "country"),
    ("person.departments", "departments"),
    ("person.subdepartments", "subdepartments"),
    ("person.seniority", "seniority"),
    ("person.functions", "functions"),
    ("person.intent_strength", "intent_strength"),
    ("person.show_intent", "show_intent"),
    ("person.email_domain_catchall", "email_domain_catchall"),
    ("person.revealed_for_current_team", "revealed_for_current_team"),
    ("person.organization.id", "organization.id"),
    ("person.organization.name", "organization.name"),
    ("person.organization.website_url", "organization.website_url"),
    ("person.organization.blog_url", "organization.blog_url"),
    ("person.organization.angellist_url", "organization.angellist_url"),
    ("person.organization.linkedin_url", "organization.linkedin_url"),
    ("person.organization.twitter_url", "organization.twitter_url"),
    ("person.organization.facebook_url", "organization.facebook_url"),
    ("person.organization.primary_phone.number", "organization.primary_phone.number"),
    ("person.organization.primary_phone.source", "organization.primary_phone.source"),
    (
        "person.organization.primary_phone.sanitized_number",
        "organization.primary_phone.sanitized_number",
    ),
    ("person.organization.languages", "organization.languages"),
    ("person.organization.alexa_ranking", "organization.alexa_ranking"),
    ("person.organization.phone", "organization.phone"),
    ("person.organization.linkedin_uid", "organization.linkedin_uid"),
    ("person.organization.founded_year", "organization.founded_year"),
    ("person.organization.publicly_traded_symbol", "organization.publicly_traded_symbol"),
    ("person.organization.publicly_traded_exchange", "organization.publicly_traded_exchange"),
    ("person.organization.logo_url", "organization.logo_url"),
    ("person.organization.crunchbase_url", "organization.crunchbase_url"),
    ("person.organization.primary_domain", "organization.primary_domain"),
    ("person.organization.sanitized_phone", "organization.sanitized_phone"),
    (
        "person.organization.organization_headcount_six_month_growth",
        "organization.organization_headcount_six_month_growth",
    ),
    (
        "person.organization.organization_headcount_twelve_month_growth",
        "organization.organization_headcount_twelve_month_growth",
    ),
    (
        "person.organization.organization_headcount_twenty_four_month_growth",
        "organization.organization_headcount_twenty_four_month_growth",
    ),
    ("person.organization.market_cap", "organization.market_cap"),
];

/// Column list enforced in fixed-schema mode, plus the path renames applied
/// before the schema filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedSchema {
    pub renames: Vec<(String, String)>,
    pub columns: Vec<String>,
}

impl FixedSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            renames: Vec::new(),
            columns,
        }
    }

    pub fn with_renames(mut self, renames: Vec<(String, String)>) -> Self {
        self.renames = renames;
        self
    }

    /// Schema used for people-match results.
    pub fn enrichment() -> Self {
        Self {
            renames: ENRICHMENT_RENAMES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            columns: ENRICHMENT_RENAMES.iter().map(|(_, to)| to.to_string()).collect(),
        }
    }

    fn rename<'a>(&'a self, path: &'a str) -> &'a str {
        self.renames
            .iter()
            .find(|(from, _)| from == path)
            .map(|(_, to)| to.as_str())
            .unwrap_or(path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Columns discovered from the records, first-seen order.
    #[default]
    Full,
    /// Exactly the schema's columns, in schema order.
    FixedSchema(FixedSchema),
}

/// Flattens one record into `(dotted path, leaf value)` pairs in document order.
///
/// Nested objects are descended; everything else, arrays included, is a leaf.
/// An empty nested object contributes no column. A record that is not an
/// object has no cells.
pub fn flatten_record(record: &LeadRecord) -> Vec<(String, Value)> {
    let mut cells = Vec::new();
    if let Value::Object(map) = record {
        flatten_into(map, None, &mut cells);
    }
    cells
}

fn flatten_into(map: &Map<String, Value>, prefix: Option<&str>, cells: &mut Vec<(String, Value)>) {
    for (key, value) in map {
        let path = match prefix {
            Some(p) => format!("{}{}{}", p, PATH_SEPARATOR, key),
            None => key.clone(),
        };
        match value {
            Value::Object(child) => flatten_into(child, Some(&path), cells),
            leaf => cells.push((path, leaf.clone())),
        }
    }
}

pub fn normalize(records: &[LeadRecord], mode: &NormalizeMode) -> LeadTable {
    let table = match mode {
        NormalizeMode::Full => normalize_full(records),
        NormalizeMode::FixedSchema(schema) => normalize_fixed(records, schema),
    };

    tracing::debug!(
        "🔄 Normalized {} records into {} columns",
        table.len(),
        table.columns().len()
    );
    table
}

fn normalize_full(records: &[LeadRecord]) -> LeadTable {
    let mut columns: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut sparse_rows: Vec<Vec<(usize, Value)>> = Vec::with_capacity(records.len());

    for record in records {
        let mut row = Vec::new();
        for (path, value) in flatten_record(record) {
            let position = match index.get(&path) {
                Some(&i) => i,
                None => {
                    let i = columns.len();
                    index.insert(path.clone(), i);
                    columns.push(path);
                    i
                }
            };
            row.push((position, value));
        }
        sparse_rows.push(row);
    }

    let rows = sparse_rows
        .into_iter()
        .map(|cells| {
            let mut row = vec![Value::Null; columns.len()];
            for (i, value) in cells {
                row[i] = value;
            }
            row
        })
        .collect();

    LeadTable::from_parts(columns, rows)
}

fn normalize_fixed(records: &[LeadRecord], schema: &FixedSchema) -> LeadTable {
    let index: HashMap<&str, usize> = schema
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            let mut row = vec![Value::Null; schema.columns.len()];
            for (path, value) in flatten_record(record) {
                if let Some(&i) = index.get(schema.rename(&path)) {
                    row[i] = value;
                }
            }
            row
        })
        .collect();

    LeadTable::from_parts(schema.columns.clone(), rows)
}
