//! Read-only helpers over the loosely-typed JSON documents returned by the cluster
//!
//! Every document the exporter consumes is a [`serde_json::Value`] tree produced by the API
//! client. Nothing here owns or mutates a document; the helpers only answer questions about
//! one:
//!
//! - [`walk`] resolves a dotted path such as `primaries.store.size_in_bytes`
//! - [`count_fields`] counts field declarations in an index mapping
//! - [`normalize_size`] turns a human-readable size such as `12gb` into bytes
//!
//! Documents that do not have the expected shape never cause a panic. Callers get `None`
//! or an error value back and decide whether to skip the affected observation.

mod field_counter;
mod size;
mod walk;

pub use field_counter::count_fields;
pub use size::{SizeParseError, normalize_size};
pub use walk::walk;
