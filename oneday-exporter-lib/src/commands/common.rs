//! Logging, configuration overrides and exporter assembly shared by the commands.

use super::config::Config;
use crate::Result;
use crate::client::EsClient;
use crate::collectors::{COLLECTOR_DEFINITIONS, Collector, Exporter, Selector};
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use ohno::EnrichableExt;
use std::collections::HashMap;

const LOG_TARGET: &str = "    common";

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Initialize the logger; `RUST_LOG` takes precedence over `log_level`.
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // a logger may already be installed when commands run more than once in a process
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Configuration file and cluster connection arguments shared by `serve` and `scrape`
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// Path to configuration file (default is `oneday-exporter.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Base URL of the Elasticsearch cluster
    #[arg(long, value_name = "URL", env = "ES_URL")]
    pub elasticsearch_url: Option<String>,

    /// Value of the `project` label
    #[arg(long, value_name = "NAME")]
    pub project: Option<String>,

    /// Value of the `cluster` label (default is the name reported by the cluster)
    #[arg(long, value_name = "NAME")]
    pub cluster_name: Option<String>,

    /// Snapshot repository whose snapshots are counted
    #[arg(long, value_name = "NAME")]
    pub snapshot_repository: Option<String>,

    /// Basic auth user
    #[arg(long, value_name = "USER", env = "ES_USERNAME")]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long, value_name = "PASSWORD", env = "ES_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Accept any TLS certificate presented by the cluster
    #[arg(long)]
    pub insecure: bool,
}

impl CommonArgs {
    /// Load the configuration file and apply the command-line overrides on top.
    ///
    /// The result is not validated; callers apply their own overrides first.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(url) = &self.elasticsearch_url {
            config.elasticsearch_url.clone_from(url);
        }
        if let Some(project) = &self.project {
            config.project.clone_from(project);
        }
        if self.cluster_name.is_some() {
            config.cluster_name.clone_from(&self.cluster_name);
        }
        if self.snapshot_repository.is_some() {
            config.snapshot_repository.clone_from(&self.snapshot_repository);
        }
        if self.username.is_some() {
            config.username.clone_from(&self.username);
        }
        if self.password.is_some() {
            config.password.clone_from(&self.password);
        }
        if self.insecure {
            config.insecure_skip_verify = true;
        }

        Ok(config)
    }
}

/// Connect to the cluster, resolve the constant labels and register the enabled collectors.
pub async fn build_exporter(config: &Config) -> Result<Exporter<EsClient>> {
    let client = EsClient::new(&config.client_options()?)?;

    let cluster = match &config.cluster_name {
        Some(name) => name.clone(),
        None => client
            .cluster_name()
            .await
            .map_err(|e| e.enrich("resolving the cluster name"))?,
    };

    log::info!(target: LOG_TARGET, "Exporting cluster '{cluster}' from {}", client.base_url());

    let const_labels = HashMap::from([
        ("cluster".to_string(), cluster),
        ("project".to_string(), config.project.clone()),
    ]);

    let mut exporter = Exporter::new(client, const_labels);

    for &def in COLLECTOR_DEFINITIONS {
        if !config.collectors.enabled(def.name) {
            continue;
        }

        if def.selector == Selector::Repository {
            match &config.snapshot_repository {
                Some(repository) => exporter.register(Collector::with_repository(def, repository.as_str())),
                None => log::debug!(target: LOG_TARGET, "No snapshot repository configured, skipping '{}'", def.name),
            }
        } else {
            exporter.register(Collector::new(def));
        }
    }

    log::info!(
        target: LOG_TARGET,
        "Enabled collectors: {}",
        exporter.collector_names().collect::<Vec<_>>().join(", ")
    );

    Ok(exporter)
}
