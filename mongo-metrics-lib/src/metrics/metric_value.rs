use serde::ser::Error;
use serde::{Serialize, Serializer};

/// A value that may be stored in the `fields` of a metric record.
///
/// Numbers keep the width they had in the source document. Serialization fails
/// for NaN and infinite doubles, which have no JSON number form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Int32(i32),
    Int64(i64),
    Double(f64),
    Boolean(bool),
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Int32(v) => serializer.serialize_i32(v),
            Self::Int64(v) => serializer.serialize_i64(v),
            Self::Double(v) if v.is_finite() => serializer.serialize_f64(v),
            Self::Double(v) => Err(S::Error::custom(format!("non-finite number {v} cannot be represented in JSON"))),
            Self::Boolean(v) => serializer.serialize_bool(v),
        }
    }
}
