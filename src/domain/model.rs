use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One person/lead as returned by the API. No shape is assumed beyond "JSON value".
pub type LeadRecord = Value;

/// Ordered multimap of query parameters.
///
/// Keys keep the position of their first insertion; every key owns the full
/// sequence of its values so array parameters (`personTitles[]`) keep their
/// multiplicity and order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    entries: Vec<(String, Vec<String>)>,
}

/// Parameters as authored by the search UI (camelCase, bracketed keys).
pub type RawParameterSet = ParameterSet;

/// Parameters in the convention of the search/enrichment API (snake_case).
pub type ApiParameterSet = ParameterSet;

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one value to `key`, creating the key if needed.
    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value.into()),
            None => self.entries.push((key.to_string(), vec![value.into()])),
        }
    }

    /// Replaces every value of `key`. An existing key keeps its position.
    pub fn set(&mut self, key: &str, values: Vec<String>) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key.to_string(), values)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Flattened `(key, value)` pairs, array values repeated under the same key.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (key, values) in iter {
            set.set(&key.into(), values);
        }
        set
    }
}

/// Flattened tabular projection of a sequence of lead records.
///
/// Missing cells hold `Value::Null`. Row `i` always comes from input record `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl LeadTable {
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[index])
    }

    /// Cells of one column, top to bottom.
    pub fn column_values<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a Value>> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(move |r| &r[index]))
    }

    /// UTF-8, comma-delimited CSV with a header row.
    ///
    /// Nulls become empty cells, strings are written raw, and arrays/objects
    /// keep their JSON text.
    pub fn to_csv(&self) -> crate::utils::error::Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        if !self.columns.is_empty() {
            writer.write_record(&self.columns)?;
            for row in &self.rows {
                writer.write_record(row.iter().map(cell_text))?;
            }
        }

        writer.into_inner().map_err(|e| {
            crate::utils::error::LeadError::IoError(std::io::Error::new(
                e.error().kind(),
                e.error().to_string(),
            ))
        })
    }
}

/// Text form of a single cell as written to CSV and terminal output.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_keeps_multiplicity_and_order() {
        let mut params = ParameterSet::new();
        params.push("personTitles[]", "CEO");
        params.push("q_keywords", "saas");
        params.push("personTitles[]", "CTO");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("personTitles[]").unwrap(), ["CEO", "CTO"]);
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["personTitles[]", "q_keywords"]);
        assert_eq!(
            params.pairs().collect::<Vec<_>>(),
            vec![
                ("personTitles[]", "CEO"),
                ("personTitles[]", "CTO"),
                ("q_keywords", "saas")
            ]
        );
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut params = ParameterSet::new();
        params.push("page", "9");
        params.push("per_page", "10");
        params.set("page", vec!["1".to_string()]);

        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["page", "per_page"]);
        assert_eq!(params.get("page").unwrap(), ["1"]);
    }

    #[test]
    fn test_csv_output_quotes_and_nulls() {
        let table = LeadTable::from_parts(
            vec!["name".to_string(), "title".to_string(), "tags".to_string()],
            vec![
                vec![json!("Ada"), json!("CEO, Founder"), json!(["a", "b"])],
                vec![json!("Grace"), Value::Null, json!(42)],
            ],
        );

        let csv = String::from_utf8(table.to_csv().unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "name,title,tags");
        assert_eq!(lines[1], "Ada,\"CEO, Founder\",\"[\"\"a\"\",\"\"b\"\"]\"");
        assert_eq!(lines[2], "Grace,,42");
    }

    #[test]
    fn test_csv_of_schema_only_table_is_header() {
        let table = LeadTable::from_parts(vec!["a".to_string(), "b".to_string()], vec![]);
        assert_eq!(table.to_csv().unwrap(), b"a,b\n");
    }
}
