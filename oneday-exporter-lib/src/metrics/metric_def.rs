use strum::Display;

/// Prefix shared by every exported metric name.
pub const NAMESPACE: &str = "oneday_elasticsearch";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MetricKind {
    Gauge,
    Counter,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MetricDef {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub labels: &'static [&'static str],
}

impl MetricDef {
    /// The exported name, including the namespace prefix.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{NAMESPACE}_{}", self.name)
    }
}

macro_rules! metric_def {
    ($name:expr, $help:expr, $kind:ident, $labels:expr) => {
        MetricDef {
            name: $name,
            help: $help,
            kind: MetricKind::$kind,
            labels: $labels,
        }
    };
}

const INDEX_LABELS: &[&str] = &["index", "index_group"];
const GROUP_LABELS: &[&str] = &["index_group"];
const REPOSITORY_LABELS: &[&str] = &["repository"];
const SCOPE_LABELS: &[&str] = &["scope"];
const HEALTH_LABELS: &[&str] = &["index", "index_group", "color"];
const COLLECTOR_LABELS: &[&str] = &["collector"];

pub static INDEX_SIZE_PRIMARY: MetricDef = metric_def!(
    "indices_store_size_bytes_primary",
    "Size of each index to date",
    Gauge,
    INDEX_LABELS
);

pub static INDEX_SIZE_TOTAL: MetricDef = metric_def!(
    "indices_store_size_bytes_total",
    "Total (primary + all replicas) size of each index to date",
    Gauge,
    INDEX_LABELS
);

pub static INDEX_DOCS: MetricDef = metric_def!("indices_docs_total", "Count of docs for each index to date", Gauge, INDEX_LABELS);

pub static INDEX_GROUP_SIZE: MetricDef = metric_def!(
    "indices_group_store_size_bytes",
    "Bytes added to each index group since the previous scrape",
    Counter,
    GROUP_LABELS
);

pub static FIELDS_COUNT: MetricDef = metric_def!("fields_count_total", "Count of fields of each index to date", Gauge, INDEX_LABELS);

pub static FIELDS_GROUP_COUNT: MetricDef = metric_def!(
    "fields_group_count_total",
    "Total number of fields of each index group to date",
    Gauge,
    GROUP_LABELS
);

pub static FIELDS_LIMIT: MetricDef = metric_def!(
    "fields_limit_total",
    "Total limit of fields of each index to date",
    Gauge,
    INDEX_LABELS
);

pub static FIELDS_GROUP_LIMIT: MetricDef = metric_def!(
    "fields_group_limit_total",
    "Total limit of fields of each index group to date",
    Gauge,
    GROUP_LABELS
);

pub static SNAPSHOTS_COUNT: MetricDef = metric_def!("snapshots_count_total", "Count of snapshots", Gauge, REPOSITORY_LABELS);

pub static EXCLUDE_EXISTS: MetricDef = metric_def!(
    "exclude_exists",
    "Whether an allocation exclude filter exists in cluster settings",
    Counter,
    SCOPE_LABELS
);

pub static MAX_SHARDS_PER_NODE: MetricDef = metric_def!(
    "cluster_max_shards_per_node",
    "Effective cluster.max_shards_per_node setting",
    Gauge,
    &[]
);

pub static INDEX_HEALTH: MetricDef = metric_def!(
    "indices_health_status",
    "Health color of each index to date, 1 for the current color",
    Gauge,
    HEALTH_LABELS
);

pub static INDEX_SHARDS: MetricDef = metric_def!(
    "indices_shards_primary",
    "Number of primary shards of each index to date",
    Gauge,
    INDEX_LABELS
);

pub static INDEX_REPLICAS: MetricDef = metric_def!(
    "indices_replicas",
    "Number of replicas of each index to date",
    Gauge,
    INDEX_LABELS
);

pub static CAT_SIZE_PRIMARY: MetricDef = metric_def!(
    "cat_indices_store_size_bytes_primary",
    "Primary store size of each index to date, as reported by the cat API",
    Gauge,
    INDEX_LABELS
);

pub static CAT_DOCS: MetricDef = metric_def!(
    "cat_indices_docs_total",
    "Count of docs for each index to date, as reported by the cat API",
    Gauge,
    INDEX_LABELS
);

pub static COLLECTOR_SUCCESS: MetricDef = metric_def!(
    "collector_success",
    "Whether the collector fetched its document during this scrape",
    Gauge,
    COLLECTOR_LABELS
);

pub static COLLECTOR_DURATION: MetricDef = metric_def!(
    "collector_duration_seconds",
    "Time the collector spent during this scrape",
    Gauge,
    COLLECTOR_LABELS
);

pub static METRIC_DEFINITIONS: &[&MetricDef] = &[
    &INDEX_SIZE_PRIMARY,
    &INDEX_SIZE_TOTAL,
    &INDEX_DOCS,
    &INDEX_GROUP_SIZE,
    &FIELDS_COUNT,
    &FIELDS_GROUP_COUNT,
    &FIELDS_LIMIT,
    &FIELDS_GROUP_LIMIT,
    &SNAPSHOTS_COUNT,
    &EXCLUDE_EXISTS,
    &MAX_SHARDS_PER_NODE,
    &INDEX_HEALTH,
    &INDEX_SHARDS,
    &INDEX_REPLICAS,
    &CAT_SIZE_PRIMARY,
    &CAT_DOCS,
    &COLLECTOR_SUCCESS,
    &COLLECTOR_DURATION,
];
