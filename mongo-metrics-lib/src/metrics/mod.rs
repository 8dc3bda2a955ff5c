//! Conversion of query result documents into metric records
//!
//! A metric record is the flat shape Telegraf expects from a JSON-lines source:
//! a map of numeric or boolean `fields`, a map of string `tags`, and a
//! `timestamp` in seconds.
//!
//! # Implementation Model
//!
//! Each document value is first classified into a [`DocValue`], a closed set of
//! shapes (32/64-bit integer, double, boolean, string, nested mapping, other).
//! [`convert`] then applies the placement policy as a single exhaustive match over
//! that classification, so every possible BSON value has exactly one destination.
//!
//! Nested mappings are flattened one level, which exposes the members of a
//! `$group` stage's `_id` document as ordinary tags and fields.

mod convert;
mod doc_value;
mod metric_record;
mod metric_value;

pub use convert::convert;
pub use doc_value::{DocValue, render_text};
pub use metric_record::{MetricRecord, Tags};
pub use metric_value::MetricValue;
