//! Access to the cluster's administrative HTTP API
//!
//! [`DocumentSource`] is the seam between the collectors and the network: given a
//! [`DocumentKind`] and a selector it yields one untyped JSON document. [`EsClient`] is the
//! production implementation, a thin `reqwest` wrapper with a bounded per-request timeout,
//! optional basic auth and optional custom TLS trust. No retries are attempted; the next
//! scrape is the next attempt.

mod document_kind;
mod es_client;

pub use document_kind::DocumentKind;
pub use es_client::{ClientOptions, DocumentSource, EsClient};
