use super::Host;
use super::common::{CommonArgs, LogLevel, build_exporter, init_logging};
use crate::Result;
use crate::server;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Address to listen on, e.g. `0.0.0.0:9101`
    #[arg(long, value_name = "ADDR")]
    pub listen_address: Option<String>,

    /// Path serving the metrics
    #[arg(long, value_name = "PATH")]
    pub metrics_path: Option<String>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_enum, default_value = "info", value_name = "LEVEL")]
    pub log_level: LogLevel,
}

/// Serve metrics over HTTP until interrupted
pub async fn serve<H: Host>(host: &mut H, args: &ServeArgs) -> Result<()> {
    init_logging(args.log_level);

    let mut config = args.common.load_config()?;
    if let Some(addr) = &args.listen_address {
        config.listen_address.clone_from(addr);
    }
    if let Some(path) = &args.metrics_path {
        config.metrics_path.clone_from(path);
    }
    config.validate()?;

    let exporter = build_exporter(&config).await?;
    let listener = server::bind(&config.listen_address).await?;

    let _ = writeln!(
        host.output(),
        "Serving metrics on http://{}{}",
        config.listen_address, config.metrics_path
    );

    server::serve(listener, server::router(exporter, &config.metrics_path)).await
}
