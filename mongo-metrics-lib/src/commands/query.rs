use super::Host;
use super::config::{QueryArgs, QueryConfig};
use crate::Result;
use crate::executor::{QueryError, RunSummary, execute};
use crate::source::{Connector, MongoConnector};
use chrono::Utc;
use ohno::app_err;
use std::io::Write;

/// Run the configured query against MongoDB and print its metrics
pub async fn process_query<H: Host>(host: &mut H, args: &QueryArgs) -> Result<()> {
    query_with(host, &MongoConnector, args, Utc::now().timestamp()).await
}

async fn query_inner<H: Host, C: Connector>(
    host: &mut H,
    connector: &C,
    args: &QueryArgs,
    timestamp: i64,
) -> Result<(QueryConfig, RunSummary), QueryError> {
    let config = QueryConfig::from_args(args).map_err(QueryError::Config)?;
    let summary = execute(connector, &config, timestamp, host).await?;
    Ok((config, summary))
}

/// Run a query through `connector`, reporting the outcome on the host's error stream
///
/// Every record of the run carries `timestamp`.
pub async fn query_with<H: Host, C: Connector>(host: &mut H, connector: &C, args: &QueryArgs, timestamp: i64) -> Result<()> {
    match query_inner(host, connector, args, timestamp).await {
        Ok((config, summary)) => {
            let skipped = summary.skipped.len();
            if skipped == 0 {
                let _ = writeln!(host.error(), "Successfully output {} metrics for query: {}", summary.emitted, config.name);
            } else {
                let _ = writeln!(
                    host.error(),
                    "Successfully output {} metrics for query: {} ({skipped} skipped)",
                    summary.emitted,
                    config.name
                );
            }
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ {e}");
            host.exit(1);
            Err(app_err!("{e}"))
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::TestHost;
    use crate::commands::config::DEFAULT_QUERY_NAME;
    use crate::source::fake::{FakeConnector, FakeItem};
    use mongodb::bson::doc;

    const TS: i64 = 1_700_000_000;

    fn args() -> QueryArgs {
        QueryArgs {
            uri: "mongodb://localhost:27017".to_owned(),
            database: "app".to_owned(),
            collection: "orders".to_owned(),
            query: r#"{"state": "open"}"#.to_owned(),
            projection: None,
            name: "open_orders".to_owned(),
            tags: Some("env=prod, source=db ,bad".to_owned()),
        }
    }

    #[tokio::test]
    async fn test_success_reports_count_and_name() {
        let connector = FakeConnector::with_items([
            FakeItem::Document(doc! { "_id": { "region": "us" }, "count": 3 }),
            FakeItem::Document(doc! { "_id": { "region": "eu" }, "count": 5 }),
        ]);
        let mut host = TestHost::new();

        query_with(&mut host, &connector, &args(), TS).await.unwrap();

        insta::assert_snapshot!(host.output_str().trim_end(), @r#"
        {"fields":{"count":3},"tags":{"env":"prod","region":"us","source":"db"},"timestamp":1700000000}
        {"fields":{"count":5},"tags":{"env":"prod","region":"eu","source":"db"},"timestamp":1700000000}
        "#);
        assert_eq!(host.error_str(), "Successfully output 2 metrics for query: open_orders\n");
        assert_eq!(host.exit_code, None);
    }

    #[tokio::test]
    async fn test_empty_results_report_zero() {
        let connector = FakeConnector::default();
        let mut host = TestHost::new();
        let mut args = args();
        args.name = DEFAULT_QUERY_NAME.to_owned();

        query_with(&mut host, &connector, &args, TS).await.unwrap();

        assert!(host.output_buf.is_empty());
        assert_eq!(host.error_str(), "Successfully output 0 metrics for query: mongo_query\n");
    }

    #[tokio::test]
    async fn test_skipped_item_still_succeeds() {
        let connector = FakeConnector::with_items([
            FakeItem::Document(doc! { "n": 1 }),
            FakeItem::Raw(FakeConnector::malformed_bytes()),
            FakeItem::Document(doc! { "n": 2 }),
        ]);
        let mut host = TestHost::new();

        let result = query_with(&mut host, &connector, &args(), TS).await;

        assert!(result.is_ok());
        assert_eq!(host.exit_code, None);
        assert_eq!(host.output_str().lines().count(), 2);

        let errors = host.error_str();
        assert_eq!(errors.matches("Warning: ").count(), 1, "{errors}");
        assert!(errors.contains("Successfully output 2 metrics for query: open_orders (1 skipped)"), "{errors}");
    }

    #[tokio::test]
    async fn test_connection_failure_is_fatal() {
        let connector = FakeConnector {
            refuse_connection: true,
            ..FakeConnector::default()
        };
        let mut host = TestHost::new();

        let result = query_with(&mut host, &connector, &args(), TS).await;

        assert!(result.is_err());
        assert_eq!(host.exit_code, Some(1));
        assert!(host.output_buf.is_empty());

        let errors = host.error_str();
        assert!(errors.contains("failed to connect to MongoDB"), "{errors}");
        assert!(!errors.contains("Successfully output"), "{errors}");
    }

    #[tokio::test]
    async fn test_invalid_filter_fails_before_connecting() {
        let connector = FakeConnector::default();
        let mut host = TestHost::new();
        let mut args = args();
        args.query = "not json".to_owned();

        let result = query_with(&mut host, &connector, &args, TS).await;

        assert!(result.is_err());
        assert_eq!(host.exit_code, Some(1));
        assert_eq!(connector.log.borrow().connects, 0);
        assert!(host.error_str().contains("invalid configuration"));
    }

    #[tokio::test]
    async fn test_iteration_failure_is_fatal_after_partial_output() {
        let connector = FakeConnector::with_items([FakeItem::Document(doc! { "n": 1 }), FakeItem::Failure("cursor not found")]);
        let mut host = TestHost::new();

        let result = query_with(&mut host, &connector, &args(), TS).await;

        assert!(result.is_err());
        assert_eq!(host.exit_code, Some(1));
        assert_eq!(host.output_str().lines().count(), 1);
        assert!(host.error_str().contains("cursor error"));
        assert!(!host.error_str().contains("Successfully output"));
    }
}
