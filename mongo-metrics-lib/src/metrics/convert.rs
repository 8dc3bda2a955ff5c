use super::doc_value::{DocValue, render_text};
use super::{MetricRecord, MetricValue, Tags};
use mongodb::bson::{Bson, Document};

/// Convert a result document into a metric record.
///
/// Numbers and booleans become fields, strings become tags. A nested document is
/// flattened one level: its entries land at the top level under their own keys and
/// the outer key is dropped. Everything else is stored as a tag holding its text form.
/// Entries are applied in document order on top of `base_tags`, so later entries win.
#[must_use]
pub fn convert(document: &Document, base_tags: &Tags, timestamp: i64) -> MetricRecord {
    let mut record = MetricRecord::new(base_tags, timestamp);

    for (key, value) in document {
        match DocValue::classify(value) {
            DocValue::Mapping(nested) => {
                for (nested_key, nested_value) in nested {
                    insert_leaf(&mut record, nested_key, nested_value);
                }
            }
            DocValue::Int32(_) | DocValue::Int64(_) | DocValue::Double(_) | DocValue::Boolean(_) | DocValue::String(_) | DocValue::Other(_) => {
                insert_leaf(&mut record, key, value);
            }
        }
    }

    record
}

// A mapping reaching this point is already one level deep, so it is not flattened again.
fn insert_leaf(record: &mut MetricRecord, key: &str, value: &Bson) {
    match DocValue::classify(value) {
        DocValue::Int32(v) => record.insert_field(key, MetricValue::Int32(v)),
        DocValue::Int64(v) => record.insert_field(key, MetricValue::Int64(v)),
        DocValue::Double(v) => record.insert_field(key, MetricValue::Double(v)),
        DocValue::Boolean(v) => record.insert_field(key, MetricValue::Boolean(v)),
        DocValue::String(s) => record.insert_tag(key, s.to_owned()),
        DocValue::Mapping(_) | DocValue::Other(_) => record.insert_tag(key, render_text(value)),
    }
}
