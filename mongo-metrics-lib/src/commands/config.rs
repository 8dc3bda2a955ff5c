use crate::Result;
use crate::metrics::Tags;
use crate::source::{ConnectionTarget, QuerySpec};
use clap::Args;
use clap::builder::NonEmptyStringValueParser;
use mongodb::bson::{Bson, Document};
use ohno::{IntoAppError, bail};

/// Query name used when none is configured
pub const DEFAULT_QUERY_NAME: &str = "mongo_query";

/// Query settings, each of which can also be supplied through the environment
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// MongoDB connection string
    #[arg(long, value_name = "URI", env = "MONGO_URI", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
    pub uri: String,

    /// Database to query
    #[arg(long, value_name = "NAME", env = "MONGO_DATABASE", value_parser = NonEmptyStringValueParser::new())]
    pub database: String,

    /// Collection to query
    #[arg(long, value_name = "NAME", env = "MONGO_COLLECTION", value_parser = NonEmptyStringValueParser::new())]
    pub collection: String,

    /// Query filter, as a JSON object (extended JSON such as `{"$oid": ...}` is accepted)
    #[arg(long, value_name = "JSON", env = "MONGO_QUERY", value_parser = NonEmptyStringValueParser::new())]
    pub query: String,

    /// Fields to return, as a JSON object (default is all fields)
    #[arg(long, value_name = "JSON", env = "MONGO_PROJECTION")]
    pub projection: Option<String>,

    /// Name of the query, reported in the summary line
    #[arg(long, value_name = "NAME", env = "QUERY_NAME", default_value = DEFAULT_QUERY_NAME)]
    pub name: String,

    /// Tags added to every metric, as `key=value,key=value`
    #[arg(long, value_name = "TAGS", env = "METRIC_TAGS")]
    pub tags: Option<String>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub name: String,
    pub target: ConnectionTarget,
    pub query: QuerySpec,
    pub tags: Tags,
}

impl QueryConfig {
    /// Resolve the command-line/environment settings
    ///
    /// # Errors
    ///
    /// Returns an error if the filter or projection is not a JSON object
    pub fn from_args(args: &QueryArgs) -> Result<Self> {
        let filter = parse_json_object(&args.query, "query filter")?;

        let projection = match args.projection.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(parse_json_object(text, "projection")?).filter(|p| !p.is_empty()),
        };

        let name = match args.name.trim() {
            "" => DEFAULT_QUERY_NAME.to_owned(),
            name => name.to_owned(),
        };

        Ok(Self {
            name,
            target: ConnectionTarget {
                uri: args.uri.clone(),
                database: args.database.clone(),
                collection: args.collection.clone(),
            },
            query: QuerySpec { filter, projection },
            tags: args.tags.as_deref().map(parse_tags).unwrap_or_default(),
        })
    }
}

/// Parse `key=value` pairs separated by commas
///
/// Keys and values are trimmed. Pairs without `=` or with an empty key are dropped,
/// and a repeated key keeps its last value.
#[must_use]
pub fn parse_tags(text: &str) -> Tags {
    text.split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

/// Parse a JSON object into a BSON document, honoring extended JSON
fn parse_json_object(text: &str, what: &str) -> Result<Document> {
    let value: serde_json::Value = serde_json::from_str(text).into_app_err_with(|| format!("the {what} is not valid JSON"))?;
    if !value.is_object() {
        bail!("the {what} must be a JSON object");
    }

    match Bson::try_from(value).into_app_err_with(|| format!("the {what} contains invalid extended JSON"))? {
        Bson::Document(document) => Ok(document),
        _ => bail!("the {what} must be a JSON object, not a single extended JSON value"),
    }
}
