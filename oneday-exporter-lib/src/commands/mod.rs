//! Command-line interface and orchestration for oneday-exporter
//!
//! # Commands
//!
//! - **serve**: Connect to the cluster, register the enabled collectors and serve the
//!   exposition over HTTP until interrupted
//! - **scrape**: Run a single scrape and print the exposition, for checking a deployment
//!   by hand
//! - **init**: Generate a default configuration file
//! - **validate**: Check a configuration file's syntax and values
//!
//! All output goes through [`Host`], so commands can run against in-memory buffers.
//!
//! Configuration is a TOML file (`oneday-exporter.toml` by default) whose values can be
//! overridden on the command line, and in part through the environment.

mod common;
mod config;
mod host;
mod init;
mod run;
mod scrape;
mod serve;
mod validate;

#[cfg(debug_assertions)]
pub use config::{CollectorsConfig, Config};

#[cfg(test)]
pub use host::TestHost;

pub use common::{CommonArgs, LogLevel};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use scrape::{ScrapeArgs, scrape};
pub use serve::{ServeArgs, serve};
pub use validate::{ValidateArgs, validate_config};
