//! Command-line interface and orchestration for mongo-metrics
//!
//! This module turns the command line and environment into a query configuration
//! and drives a single run from connection to summary line.
//!
//! # Implementation Model
//!
//! ## Configuration
//!
//! Every setting is a clap argument with an environment-variable fallback, so the
//! tool can be driven purely by the environment (as Telegraf's `exec` input does)
//! or by flags. [`QueryConfig::from_args`] resolves them: the filter and projection
//! are parsed from JSON into BSON, and the tag list is split into base tags.
//!
//! ## Execution Flow
//!
//! 1. Parse arguments and initialize logging
//! 2. Resolve the configuration (`--validate-config` stops here and prints it)
//! 3. Capture the run timestamp once
//! 4. Connect, query, and stream metric lines via the executor
//! 5. Report the summary line, or a fatal error with a non-zero exit
//!
//! All output goes through [`Host`], which separates metric lines from diagnostics
//! and lets tests capture both.

mod common;
mod config;
mod host;
mod query;
mod run;
mod validate;

pub use common::LogLevel;
pub use config::{DEFAULT_QUERY_NAME, QueryArgs, QueryConfig, parse_tags};
pub use host::Host;
#[cfg(test)]
pub use host::TestHost;
pub use query::{process_query, query_with};
pub use run::run;
pub use validate::validate_config;
