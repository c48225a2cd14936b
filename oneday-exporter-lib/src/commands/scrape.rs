use super::Host;
use super::common::{CommonArgs, LogLevel, build_exporter, init_logging};
use crate::Result;
use crate::collectors::ScrapeDay;
use chrono::NaiveDate;
use clap::Parser;
use ohno::app_err;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ScrapeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Day whose indices are scraped, as YYYY-MM-DD (default is today)
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_enum, default_value = "warn", value_name = "LEVEL")]
    pub log_level: LogLevel,
}

/// Run a single scrape and print the exposition
pub async fn scrape<H: Host>(host: &mut H, args: &ScrapeArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = args.common.load_config()?;
    config.validate()?;

    let day = args.date.map_or_else(ScrapeDay::today, ScrapeDay::new);
    let mut exporter = build_exporter(&config).await?;
    let scrape = exporter.scrape(&day).await;
    let text = exporter.render(&scrape)?;

    let _ = write!(host.output(), "{text}");

    if scrape.all_failed() {
        let _ = writeln!(host.error(), "❌ Every collector failed, see the log for details");
        host.exit(1);
        return Err(app_err!("every collector failed"));
    }

    Ok(())
}
