//! Command dispatch logic for oneday-exporter

use super::{InitArgs, ScrapeArgs, ServeArgs, ValidateArgs, init_config, scrape, serve, validate_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "oneday-exporter", version, author, long_about = None)]
#[command(about = "Export daily Elasticsearch index metrics to Prometheus")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve metrics over HTTP
    Serve(Box<ServeArgs>),
    /// Scrape the cluster once and print the metrics
    Scrape(Box<ScrapeArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        Command::Serve(serve_args) => serve(host, serve_args).await,
        Command::Scrape(scrape_args) => scrape(host, scrape_args).await,
        Command::Init(init_args) => init_config(host, init_args),
        Command::Validate(validate_args) => validate_config(host, validate_args),
    }
}
