#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for oneday-exporter
//!
//! This library consolidates all functionality for the oneday-exporter tool, which polls an
//! Elasticsearch cluster's administrative API on every scrape and republishes a fixed set of
//! index, mapping, settings and snapshot facts as Prometheus samples.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`client`]: Cluster API client and the document kinds it can fetch
//! - [`document`]: Path walking, field counting and size normalization over JSON documents
//! - [`collectors`]: Extraction rules, per-collector state and the scrape driver
//! - [`metrics`]: Metric descriptors, observations and text exposition
//! - [`server`]: HTTP endpoints serving the exposition

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod client;
#[cfg(not(any(debug_assertions, test)))]
mod client;

#[cfg(any(debug_assertions, test))]
pub mod collectors;
#[cfg(not(any(debug_assertions, test)))]
mod collectors;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod document;
#[cfg(not(any(debug_assertions, test)))]
mod document;

#[cfg(any(debug_assertions, test))]
pub mod metrics;
#[cfg(not(any(debug_assertions, test)))]
mod metrics;

#[cfg(any(debug_assertions, test))]
pub mod server;
#[cfg(not(any(debug_assertions, test)))]
mod server;

pub use crate::commands::{Host, run};
