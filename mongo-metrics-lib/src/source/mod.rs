//! Document sources
//!
//! The executor talks to the database through three small traits so that the
//! query loop can be exercised without a server:
//!
//! - [`Connector`] establishes a connection (including the liveness ping) within a deadline
//! - [`DocumentSource`] runs one `find` and hands back a cursor, and releases the connection on [`close`](DocumentSource::close)
//! - [`DocumentCursor`] walks the results forward once, decoding each item on demand
//!
//! Advancing the cursor and decoding the current item are separate steps, which lets
//! the caller tell a broken result stream apart from one unreadable document.

#[cfg(test)]
pub mod fake;
mod mongo;

use crate::Result;
use core::fmt;
use core::future::Future;
use core::time::Duration;
use mongodb::bson::{Document, RawDocument};
use ohno::IntoAppError;

pub use mongo::{MongoConnector, MongoCursor, MongoSource};

/// Upper bound on establishing and verifying a connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the documents live.
#[derive(Clone)]
pub struct ConnectionTarget {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

// The connection string may carry credentials.
impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionTarget")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

/// The single query a run executes.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub filter: Document,

    /// `None` returns all fields.
    pub projection: Option<Document>,
}

pub trait Connector {
    type Source: DocumentSource;

    /// Connect to `target` and verify the connection is alive, giving up after `timeout`.
    fn connect(&self, target: &ConnectionTarget, timeout: Duration) -> impl Future<Output = Result<Self::Source>>;
}

pub trait DocumentSource {
    type Cursor: DocumentCursor;

    /// Start a `find` with the given filter and projection.
    fn find(&self, query: &QuerySpec) -> impl Future<Output = Result<Self::Cursor>>;

    /// Release the connection. Any cursor obtained from this source must be dropped first.
    fn close(self) -> impl Future<Output = ()>;
}

pub trait DocumentCursor {
    /// Move to the next item. Returns `false` once the results are exhausted.
    fn advance(&mut self) -> impl Future<Output = Result<bool>>;

    /// Decode the item the cursor is positioned on.
    fn decode_current(&self) -> Result<Document>;
}

/// Decode a raw BSON document, validating every element.
pub fn decode_raw(raw: &RawDocument) -> Result<Document> {
    Document::try_from(raw).into_app_err("malformed BSON document")
}
