//! Collectors and the scrape driver
//!
//! Each collector is data, not code: a [`CollectorDef`] names the document it fetches, the
//! selector it fetches it with, how the document splits into entries, and a table of
//! [`ExtractionRule`]s applied to every entry. A single driver, [`Collector`], evaluates those
//! rules and keeps the only state that survives between scrapes: a [`DeltaAccumulator`]
//! measuring how much each index grew.
//!
//! # Scrape model
//!
//! [`Exporter::scrape`] runs every registered collector once, sequentially, in registration
//! order. A collector whose fetch fails is logged and reported through `collector_success`
//! while the remaining collectors still run. A missing path or malformed value inside a
//! document only drops that one sample.
//!
//! Daily collectors scope themselves to a [`ScrapeDay`]: the cluster is asked for
//! `*-<YYYY.MM.DD>` and the same stamp is stripped from index names to derive their group.

mod collector;
mod collector_def;
mod day;
mod delta;
mod exporter;
mod rule;

pub use collector::Collector;
pub use collector_def::{
    CAT_INDICES, CLUSTER_SETTINGS, COLLECTOR_DEFINITIONS, CollectorDef, Entries, FIELDS, HEALTH, INDICES, SETTINGS, SNAPSHOTS, Selector,
};
pub use day::{ScrapeDay, index_group};
pub use delta::DeltaAccumulator;
pub use exporter::{Exporter, Scrape};
pub use rule::{Coercion, CoercionError, ExtractError, ExtractionRule, Lookup, Rollup, coerce};
