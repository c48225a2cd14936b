use crate::Result;
use crate::client::ClientOptions;
use camino::{Utf8Path, Utf8PathBuf};
use core::net::SocketAddr;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Configuration file looked for in the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "oneday-exporter.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the cluster's HTTP API
    #[serde(default = "default_elasticsearch_url")]
    pub elasticsearch_url: String,

    /// Socket address the HTTP server binds to
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Path serving the exposition
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,

    /// Value of the `project` constant label
    #[serde(default)]
    pub project: String,

    /// Value of the `cluster` constant label, discovered from the cluster when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,

    /// Repository whose snapshots are counted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_repository: Option<String>,

    /// Upper bound on each request to the cluster
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Accept any certificate the cluster presents
    #[serde(default)]
    pub insecure_skip_verify: bool,

    /// Extra PEM root certificate to trust
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_certificate: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default)]
    pub collectors: CollectorsConfig,
}

/// Which collectors to register
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
#[expect(clippy::struct_excessive_bools, reason = "one switch per collector")]
pub struct CollectorsConfig {
    pub fields: bool,
    pub indices: bool,
    pub settings: bool,
    pub cluster_settings: bool,
    pub health: bool,
    pub cat_indices: bool,
}

impl Default for CollectorsConfig {
    fn default() -> Self {
        Self {
            fields: true,
            indices: true,
            settings: true,
            cluster_settings: true,
            health: true,
            cat_indices: false,
        }
    }
}

impl CollectorsConfig {
    /// Whether the collector called `name` is switched on.
    ///
    /// The snapshot collector has no switch; it runs whenever a repository is configured.
    #[must_use]
    pub fn enabled(&self, name: &str) -> bool {
        match name {
            "fields" => self.fields,
            "indices" => self.indices,
            "settings" => self.settings,
            "cluster-settings" => self.cluster_settings,
            "health" => self.health,
            "cat-indices" => self.cat_indices,
            "snapshots" => true,
            _ => false,
        }
    }
}

fn default_elasticsearch_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_listen_address() -> String {
    "0.0.0.0:9101".to_string()
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// When no path is given, `oneday-exporter.toml` in the working directory is used if it exists.
    /// The result is only parsed; call [`Config::validate`] once any overrides are applied.
    pub fn load(config_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = Utf8PathBuf::from(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))
    }

    /// Save the default configuration to a TOML file
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let _ = self.base_url()?;

        if !self.metrics_path.starts_with('/') {
            return Err(app_err!("metrics_path must start with '/', got '{}'", self.metrics_path));
        }

        if let Some(c) = self
            .metrics_path
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '.' | '-')))
        {
            return Err(app_err!("metrics_path '{}' contains unsupported character '{c}'", self.metrics_path));
        }

        if self.metrics_path == "/" || self.metrics_path == "/healthz" {
            return Err(app_err!("metrics_path '{}' collides with a built-in route", self.metrics_path));
        }

        let _ = self
            .listen_address
            .parse::<SocketAddr>()
            .into_app_err_with(|| format!("listen_address '{}' is not a socket address", self.listen_address))?;

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        if self.password.is_some() && self.username.is_none() {
            return Err(app_err!("password is set without a username"));
        }

        Ok(())
    }

    fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.elasticsearch_url)
            .into_app_err_with(|| format!("elasticsearch_url '{}' is not a valid URL", self.elasticsearch_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(app_err!("elasticsearch_url must use http or https, got '{}'", url.scheme()));
        }

        Ok(url)
    }

    /// Connection settings for the cluster client.
    pub fn client_options(&self) -> Result<ClientOptions> {
        Ok(ClientOptions {
            base_url: self.base_url()?,
            timeout: self.request_timeout,
            insecure_skip_verify: self.insecure_skip_verify,
            ca_certificate: self.ca_certificate.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.elasticsearch_url, "http://localhost:9200");
        assert_eq!(config.listen_address, "0.0.0.0:9101");
        assert_eq!(config.metrics_path, "/metrics");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.cluster_name, None);
        assert_eq!(config.snapshot_repository, None);
        assert_eq!(config.collectors, CollectorsConfig::default());
    }

    #[test]
    fn test_embedded_defaults_match_code_defaults() {
        let empty: Config = toml::from_str("").unwrap();
        let embedded = Config::default();

        assert_eq!(toml::to_string(&empty).unwrap(), toml::to_string(&embedded).unwrap());
    }

    #[test]
    fn test_collectors_enabled() {
        let collectors = CollectorsConfig::default();
        assert!(collectors.enabled("fields"));
        assert!(collectors.enabled("cluster-settings"));
        assert!(collectors.enabled("snapshots"));
        assert!(!collectors.enabled("cat-indices"));
        assert!(!collectors.enabled("unknown"));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = Config {
            elasticsearch_url: "not a url".into(),
            ..Config::default()
        };
        let _ = config.validate().unwrap_err();

        let config = Config {
            elasticsearch_url: "ftp://cluster:21".into(),
            ..Config::default()
        };
        let _ = config.validate().unwrap_err();
    }

    #[test]
    fn test_validate_rejects_bad_metrics_path() {
        for path in ["metrics", "/", "/healthz", "/metrics\"><script>", "/{name}", "/a b", "/m?x=1"] {
            let config = Config {
                metrics_path: path.into(),
                ..Config::default()
            };
            let _ = config.validate().unwrap_err();
        }
    }

    #[test]
    fn test_validate_accepts_plain_metrics_paths() {
        for path in ["/metrics", "/prometheus/v1.metrics", "/oneday_es-metrics"] {
            let config = Config {
                metrics_path: path.into(),
                ..Config::default()
            };
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_validate_rejects_bad_listen_address() {
        let config = Config {
            listen_address: "9101".into(),
            ..Config::default()
        };
        let _ = config.validate().unwrap_err();
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            request_timeout: Duration::ZERO,
            ..Config::default()
        };
        let _ = config.validate().unwrap_err();
    }

    #[test]
    fn test_validate_rejects_password_without_username() {
        let config = Config {
            password: Some("secret".into()),
            ..Config::default()
        };
        let _ = config.validate().unwrap_err();

        let config = Config {
            username: Some("exporter".into()),
            password: Some("secret".into()),
            ..Config::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_client_options() {
        let config = Config {
            elasticsearch_url: "https://es.example.com:9200".into(),
            username: Some("exporter".into()),
            ..Config::default()
        };
        let options = config.client_options().unwrap();
        assert_eq!(options.base_url.as_str(), "https://es.example.com:9200/");
        assert_eq!(options.username.as_deref(), Some("exporter"));
        assert_eq!(options.timeout, Duration::from_secs(10));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_save_default_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let output_path = Utf8PathBuf::try_from(tmp.path().join("oneday-exporter.toml")).unwrap();
        Config::save_default(&output_path).unwrap();
        let loaded = Config::load(Some(&output_path)).unwrap();
        assert_eq!(loaded.metrics_path, "/metrics");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_parses_durations_and_collectors() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("custom.toml")).unwrap();
        fs::write(
            &path,
            r#"
request_timeout = "2m"
snapshot_repository = "backups"

[collectors]
cat_indices = true
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.snapshot_repository.as_deref(), Some("backups"));
        assert!(config.collectors.cat_indices);
        assert!(config.collectors.fields);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_rejects_unknown_field() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("unknown.toml")).unwrap();
        fs::write(&path, "unknown_field = 1\n").unwrap();

        let _ = Config::load(Some(&path)).unwrap_err();
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_defers_validation() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("healthz.toml")).unwrap();
        fs::write(&path, "metrics_path = \"/healthz\"\n").unwrap();

        let mut config = Config::load(Some(&path)).unwrap();
        let _ = config.validate().unwrap_err();

        config.metrics_path = "/metrics".into();
        config.validate().unwrap();
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let _ = Config::load(Some(Utf8Path::new("/nonexistent/oneday-exporter.toml"))).unwrap_err();
    }
}
