//! Metric descriptors, observations and text exposition
//!
//! Every metric the exporter can publish is declared once, statically, in `metric_def.rs`
//! as a [`MetricDef`]: its name (without the `oneday_elasticsearch_` namespace), help text,
//! [`MetricKind`] and the ordered names of its variable labels. The names and label sets
//! are what dashboards query, so they are treated as a stable contract.
//!
//! Collectors produce [`Observation`]s, each pairing a definition with a value and the label
//! values in declaration order. At the end of a scrape [`encode`] turns the observations into
//! the Prometheus text format, attaching the `cluster` and `project` constant labels.

mod exposition;
mod metric_def;
mod observation;

pub use exposition::{content_type, encode};
pub use metric_def::*;
pub use observation::Observation;
