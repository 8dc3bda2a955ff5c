use super::Host;
use super::config::{QueryArgs, QueryConfig};
use crate::Result;
use std::io::Write;

/// Check the query settings without connecting and print what would be run
pub fn validate_config<H: Host>(host: &mut H, args: &QueryArgs) -> Result<()> {
    match QueryConfig::from_args(args) {
        Ok(config) => {
            let projection = config
                .query
                .projection
                .as_ref()
                .map_or_else(|| "all fields".to_owned(), ToString::to_string);

            let tags = if config.tags.is_empty() {
                "none".to_owned()
            } else {
                config.tags.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join(",")
            };

            let mut out = host.output();
            let _ = writeln!(out, "Configuration is valid");
            let _ = writeln!(out, "Query name: {}", config.name);
            let _ = writeln!(out, "Database: {}", config.target.database);
            let _ = writeln!(out, "Collection: {}", config.target.collection);
            let _ = writeln!(out, "Filter: {}", config.query.filter);
            let _ = writeln!(out, "Projection: {projection}");
            let _ = writeln!(out, "Tags: {tags}");
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Configuration validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}
