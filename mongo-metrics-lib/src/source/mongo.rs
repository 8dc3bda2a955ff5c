use super::{ConnectionTarget, Connector, DocumentCursor, DocumentSource, QuerySpec, decode_raw};
use crate::Result;
use core::time::Duration;
use mongodb::bson::{Document, RawDocumentBuf, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Cursor};
use ohno::IntoAppError;
use std::time::Instant;

const LOG_TARGET: &str = "     mongo";

/// Reported to the server unless the connection string names an application.
const APP_NAME: &str = "mongo-metrics";

/// Connects to a MongoDB deployment with the official driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoConnector;

impl Connector for MongoConnector {
    type Source = MongoSource;

    async fn connect(&self, target: &ConnectionTarget, timeout: Duration) -> Result<MongoSource> {
        let start = Instant::now();
        log::info!(target: LOG_TARGET, "Connecting to MongoDB");

        let source = tokio::time::timeout(timeout, open(target, timeout))
            .await
            .into_app_err_with(|| format!("no response from MongoDB within {timeout:?}"))??;

        log::debug!(target: LOG_TARGET, "Connected to MongoDB in {:.3}s", start.elapsed().as_secs_f64());
        Ok(source)
    }
}

async fn open(target: &ConnectionTarget, timeout: Duration) -> Result<MongoSource> {
    let mut options = ClientOptions::parse(target.uri.as_str())
        .await
        .into_app_err("invalid MongoDB connection string")?;

    // Timeouts given in the connection string take precedence.
    let _ = options.connect_timeout.get_or_insert(timeout);
    let _ = options.server_selection_timeout.get_or_insert(timeout);
    let _ = options.app_name.get_or_insert_with(|| APP_NAME.to_owned());

    let client = Client::with_options(options).into_app_err("unable to create the MongoDB client")?;

    if let Err(e) = client.database("admin").run_command(doc! { "ping": 1 }).await {
        client.shutdown().await;
        return Err(e).into_app_err("unable to ping MongoDB");
    }

    let collection = client.database(&target.database).collection::<RawDocumentBuf>(&target.collection);
    Ok(MongoSource { client, collection })
}

/// An open connection, bound to the collection being queried.
#[derive(Debug)]
pub struct MongoSource {
    client: Client,
    collection: Collection<RawDocumentBuf>,
}

impl DocumentSource for MongoSource {
    type Cursor = MongoCursor;

    async fn find(&self, query: &QuerySpec) -> Result<MongoCursor> {
        log::info!(
            target: LOG_TARGET,
            "Querying {} with filter {}",
            self.collection.namespace(),
            query.filter
        );

        let mut find = self.collection.find(query.filter.clone());
        if let Some(projection) = &query.projection {
            find = find.projection(projection.clone());
        }

        let inner = find.await.into_app_err("MongoDB rejected the query")?;
        Ok(MongoCursor { inner })
    }

    async fn close(self) {
        log::debug!(target: LOG_TARGET, "Disconnecting from MongoDB");

        // shutdown() waits for outstanding cursors, so callers drop theirs beforehand.
        drop(self.collection);
        self.client.shutdown().await;
    }
}

/// Results of a `find`, kept as raw BSON until each item is decoded.
#[derive(Debug)]
pub struct MongoCursor {
    inner: Cursor<RawDocumentBuf>,
}

impl DocumentCursor for MongoCursor {
    async fn advance(&mut self) -> Result<bool> {
        self.inner.advance().await.into_app_err("unable to fetch the next result")
    }

    fn decode_current(&self) -> Result<Document> {
        decode_raw(self.inner.current())
    }
}
