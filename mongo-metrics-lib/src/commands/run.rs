//! Command dispatch logic for mongo-metrics

use super::common::{LogLevel, init_logging};
use super::config::QueryArgs;
use super::{Host, process_query, validate_config};
use crate::Result;
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use ohno::app_err;
use std::io::Write;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "mongo-metrics", version, author, long_about = None)]
#[command(about = "Run a MongoDB query and print each result as a Telegraf JSON metric")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(flatten)]
    query: QueryArgs,

    /// Check the configuration and print it without connecting to MongoDB
    #[arg(long)]
    validate_config: bool,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", env = "MONGO_METRICS_LOG")]
    log_level: LogLevel,
}

/// Parse command-line arguments and run
///
/// Settings missing from the command line are read from the environment
/// (`MONGO_URI`, `MONGO_DATABASE`, `MONGO_COLLECTION`, `MONGO_QUERY`, ...).
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if argument parsing fails or the query fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = write!(host.error(), "{e}");
            host.exit(e.exit_code());
            return Err(app_err!("invalid command line"));
        }
        Err(e) => {
            // --help and --version
            let _ = write!(host.output(), "{e}");
            return Ok(());
        }
    };

    init_logging(cli.log_level);

    if cli.validate_config {
        validate_config(host, &cli.query)
    } else {
        process_query(host, &cli.query).await
    }
}
