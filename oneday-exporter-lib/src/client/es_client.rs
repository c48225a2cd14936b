use super::DocumentKind;
use crate::Result;
use camino::Utf8PathBuf;
use core::time::Duration;
use ohno::{IntoAppError, app_err, bail};
use serde_json::Value;
use std::fs;
use url::Url;

const LOG_TARGET: &str = "    client";

/// Longest stretch of an error response body carried into the error message.
const MAX_ERROR_BODY: usize = 256;

/// A provider of cluster documents
///
/// The collectors only ever see this seam, so tests can substitute canned documents for a live cluster.
pub trait DocumentSource: Send + Sync {
    /// Fetch one document of the given kind for `selector`.
    fn fetch(&self, kind: DocumentKind, selector: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// How to reach the cluster
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: Url,
    pub timeout: Duration,
    pub insecure_skip_verify: bool,
    pub ca_certificate: Option<Utf8PathBuf>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Client for the cluster's administrative HTTP API
#[derive(Debug, Clone)]
pub struct EsClient {
    client: reqwest::Client,
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
}

impl EsClient {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent("oneday-exporter")
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.insecure_skip_verify);

        if let Some(path) = &options.ca_certificate {
            let pem = fs::read(path).into_app_err_with(|| format!("reading CA certificate '{path}'"))?;
            let cert = reqwest::Certificate::from_pem(&pem).into_app_err_with(|| format!("parsing CA certificate '{path}'"))?;
            builder = builder.add_root_certificate(cert);
        }

        // Url::join replaces the last path segment unless the base ends with a slash
        let mut base_url = options.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: builder.build().into_app_err("building the HTTP client")?,
            base_url,
            username: options.username.clone(),
            password: options.password.clone(),
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Read the cluster's name from its info document.
    pub async fn cluster_name(&self) -> Result<String> {
        let info = self.get(&DocumentKind::ClusterInfo.endpoint("")).await?;

        info.get("cluster_name")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| app_err!("cluster info from {} has no 'cluster_name'", self.base_url))
    }

    async fn get(&self, endpoint: &str) -> Result<Value> {
        let url = self
            .base_url
            .join(endpoint)
            .into_app_err_with(|| format!("building a request URL for '{endpoint}'"))?;

        log::debug!(target: LOG_TARGET, "GET {url}");

        let mut request = self.client.get(url.clone());
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request.send().await.into_app_err_with(|| format!("requesting {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("request to {url} failed with status {status}: {}", truncate(&body, MAX_ERROR_BODY));
        }

        response
            .json::<Value>()
            .await
            .into_app_err_with(|| format!("decoding the response from {url}"))
    }
}

impl DocumentSource for EsClient {
    async fn fetch(&self, kind: DocumentKind, selector: &str) -> Result<Value> {
        self.get(&kind.endpoint(selector)).await
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    s.char_indices().nth(max_chars).map_or(s, |(end, _)| s.get(..end).unwrap_or(s))
}
