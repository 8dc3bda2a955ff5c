use super::MetricValue;
use serde::Serialize;
use std::collections::BTreeMap;

/// Tag names mapped to tag values.
pub type Tags = BTreeMap<String, String>;

/// One metric, as written on a single output line.
///
/// A name is present in at most one of `fields` and `tags`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub fields: BTreeMap<String, MetricValue>,
    pub tags: Tags,
    pub timestamp: i64,
}

impl MetricRecord {
    /// Create a record with no fields, starting from a copy of `base_tags`.
    #[must_use]
    pub fn new(base_tags: &Tags, timestamp: i64) -> Self {
        Self {
            fields: BTreeMap::new(),
            tags: base_tags.clone(),
            timestamp,
        }
    }

    /// Set a field, replacing any field or tag with the same name.
    pub fn insert_field(&mut self, name: &str, value: MetricValue) {
        let _ = self.tags.remove(name);
        let _ = self.fields.insert(name.to_owned(), value);
    }

    /// Set a tag, replacing any field or tag with the same name.
    pub fn insert_tag(&mut self, name: &str, value: String) {
        let _ = self.fields.remove(name);
        let _ = self.tags.insert(name.to_owned(), value);
    }

    /// Serialize as a compact single-line JSON object.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
