//! HTTP endpoints serving the exposition
//!
//! Three routes are served: the metrics path, which runs one scrape per request, a
//! `/healthz` liveness probe, and a landing page at `/` linking to the metrics.
//!
//! The exporter sits behind an async mutex, so scrapes are single-flight: overlapping
//! requests queue rather than racing on the collectors' delta state.

use crate::Result;
use crate::client::EsClient;
use crate::collectors::{Exporter, ScrapeDay};
use crate::metrics::{METRIC_DEFINITIONS, content_type};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use ohno::IntoAppError;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

const LOG_TARGET: &str = "    server";

#[derive(Debug)]
struct ServerState {
    exporter: Mutex<Exporter<EsClient>>,
    metrics_path: String,
}

type SharedState = Arc<ServerState>;

/// Rendering a scrape failed after the collectors ran
#[derive(Debug)]
struct RenderError(ohno::AppError);

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        log::error!(target: LOG_TARGET, "Unable to render metrics: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response()
    }
}

/// Build the router serving `exporter` at `metrics_path`.
pub fn router(exporter: Exporter<EsClient>, metrics_path: &str) -> Router {
    let state = Arc::new(ServerState {
        exporter: Mutex::new(exporter),
        metrics_path: metrics_path.to_string(),
    });

    Router::new()
        .route(metrics_path, get(metrics))
        .route("/healthz", get(healthz))
        .route("/", get(landing))
        .with_state(state)
}

async fn metrics(State(state): State<SharedState>) -> Result<Response, RenderError> {
    let mut exporter = state.exporter.lock().await;
    let scrape = exporter.scrape(&ScrapeDay::today()).await;
    let body = exporter.render(&scrape).map_err(RenderError)?;

    let status = if scrape.all_failed() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    Ok((status, [(CONTENT_TYPE, content_type())], body).into_response())
}

async fn healthz() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], "{\"status\":\"ok\"}\n")
}

async fn landing(State(state): State<SharedState>) -> Html<String> {
    let metrics: String = METRIC_DEFINITIONS
        .iter()
        .map(|def| format!("<li><code>{}</code> ({}): {}</li>\n", def.full_name(), def.kind, def.help))
        .collect();

    Html(format!(
        "<html>\n<head><title>oneday-exporter</title></head>\n<body>\n<h1>Elasticsearch exporter</h1>\n<p><a href=\"{path}\">Metrics</a></p>\n<ul>\n{metrics}</ul>\n</body>\n</html>\n",
        path = state.metrics_path
    ))
}

/// Bind the listening socket.
pub async fn bind(listen_address: &str) -> Result<TcpListener> {
    TcpListener::bind(listen_address)
        .await
        .into_app_err_with(|| format!("binding to {listen_address}"))
}

/// Serve `router` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log::info!(target: LOG_TARGET, "Listening on {addr}");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!(target: LOG_TARGET, "Shutting down");
        })
        .await
        .into_app_err("serving HTTP")
}
