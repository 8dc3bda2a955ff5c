//! Query execution and metric output
//!
//! [`execute`] connects, runs the configured `find`, and streams one JSON line per
//! result document to the host's output as soon as it is converted. The connection
//! is closed on every path out of the loop.
//!
//! Each item produces a `Result<String, ItemError>`: a line to write, or a reason the
//! item was skipped. Skips are reported on the host's error stream and collected in
//! the [`RunSummary`]; they never stop the run. Anything else is a [`QueryError`].

mod error;

pub use error::{ItemError, QueryError};

use crate::Result;
use crate::commands::{Host, QueryConfig};
use crate::metrics::{Tags, convert};
use crate::source::{CONNECT_TIMEOUT, Connector, DocumentCursor, DocumentSource};
use ohno::IntoAppError;
use std::io::Write;

const LOG_TARGET: &str = "  executor";

/// Outcome of a run that reached the end of its results.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub emitted: usize,
    pub skipped: Vec<ItemError>,
}

/// Run the configured query and write its metrics.
///
/// `timestamp` is stamped on every record of the run.
pub async fn execute<C: Connector, H: Host>(
    connector: &C,
    config: &QueryConfig,
    timestamp: i64,
    host: &mut H,
) -> Result<RunSummary, QueryError> {
    let source = connector
        .connect(&config.target, CONNECT_TIMEOUT)
        .await
        .map_err(QueryError::Connection)?;

    let outcome = emit_all(&source, config, timestamp, host).await;
    source.close().await;
    outcome
}

async fn emit_all<S: DocumentSource, H: Host>(
    source: &S,
    config: &QueryConfig,
    timestamp: i64,
    host: &mut H,
) -> Result<RunSummary, QueryError> {
    let mut cursor = source.find(&config.query).await.map_err(QueryError::Execution)?;
    let mut summary = RunSummary::default();

    while cursor.advance().await.map_err(QueryError::Iteration)? {
        match render_line(&cursor, &config.tags, timestamp) {
            Ok(line) => {
                write_line(host, &line).map_err(QueryError::Output)?;
                summary.emitted += 1;
            }
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Skipping result {}: {e}", summary.emitted + summary.skipped.len() + 1);
                let _ = writeln!(host.error(), "Warning: {e}");
                summary.skipped.push(e);
            }
        }
    }

    log::info!(
        target: LOG_TARGET,
        "Finished reading results: {} written, {} skipped",
        summary.emitted,
        summary.skipped.len()
    );

    Ok(summary)
}

fn render_line<C: DocumentCursor>(cursor: &C, base_tags: &Tags, timestamp: i64) -> Result<String, ItemError> {
    let document = cursor.decode_current().map_err(ItemError::Decode)?;
    convert(&document, base_tags, timestamp).to_json_line().map_err(ItemError::Serialize)
}

fn write_line<H: Host>(host: &mut H, line: &str) -> Result<()> {
    let mut output = host.output();
    writeln!(output, "{line}").into_app_err("unable to write a metric line")?;
    output.flush().into_app_err("unable to flush the output stream")
}
