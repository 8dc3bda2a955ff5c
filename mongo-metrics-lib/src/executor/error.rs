use core::fmt;

/// A failure that ends the run.
#[derive(Debug)]
pub enum QueryError {
    /// A required setting is missing or unusable.
    Config(ohno::AppError),

    /// The database could not be reached, authenticated against, or pinged in time.
    Connection(ohno::AppError),

    /// The database refused the query.
    Execution(ohno::AppError),

    /// The result stream broke after iteration started.
    Iteration(ohno::AppError),

    /// Metric lines could not be written.
    Output(ohno::AppError),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Connection(e) => write!(f, "failed to connect to MongoDB: {e}"),
            Self::Execution(e) => write!(f, "failed to execute query: {e}"),
            Self::Iteration(e) => write!(f, "cursor error: {e}"),
            Self::Output(e) => write!(f, "failed to write metrics: {e}"),
        }
    }
}

impl core::error::Error for QueryError {}

/// A failure confined to one result item. The item is skipped.
#[derive(Debug)]
pub enum ItemError {
    Decode(ohno::AppError),
    Serialize(serde_json::Error),
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "failed to decode result: {e}"),
            Self::Serialize(e) => write!(f, "failed to marshal metric: {e}"),
        }
    }
}

impl core::error::Error for ItemError {}
