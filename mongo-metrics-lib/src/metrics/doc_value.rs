use mongodb::bson::{Bson, Document};

/// The shape of a document value, as far as metric conversion is concerned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DocValue<'a> {
    Int32(i32),
    Int64(i64),
    Double(f64),
    Boolean(bool),
    String(&'a str),
    Mapping(&'a Document),
    Other(&'a Bson),
}

impl<'a> DocValue<'a> {
    #[must_use]
    pub fn classify(value: &'a Bson) -> Self {
        match value {
            Bson::Int32(v) => Self::Int32(*v),
            Bson::Int64(v) => Self::Int64(*v),
            Bson::Double(v) => Self::Double(*v),
            Bson::Boolean(v) => Self::Boolean(*v),
            Bson::String(s) => Self::String(s),
            Bson::Document(d) => Self::Mapping(d),
            other => Self::Other(other),
        }
    }
}

/// Text used when a value has to be stored as a tag.
#[must_use]
pub fn render_text(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::DateTime(dt) => dt.try_to_rfc3339_string().unwrap_or_else(|_| dt.to_string()),
        other => other.to_string(),
    }
}
