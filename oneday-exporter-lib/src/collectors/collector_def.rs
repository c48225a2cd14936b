use super::rule::{ExtractionRule, Lookup, Rollup, coerce};
use crate::client::DocumentKind;
use crate::metrics::{
    CAT_DOCS, CAT_SIZE_PRIMARY, EXCLUDE_EXISTS, FIELDS_COUNT, FIELDS_GROUP_COUNT, FIELDS_GROUP_LIMIT, FIELDS_LIMIT, INDEX_DOCS,
    INDEX_GROUP_SIZE, INDEX_HEALTH, INDEX_REPLICAS, INDEX_SHARDS, INDEX_SIZE_PRIMARY, INDEX_SIZE_TOTAL, MAX_SHARDS_PER_NODE,
    SNAPSHOTS_COUNT,
};

/// What a collector asks the cluster for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Every index of the scrape day, `*-<YYYY.MM.DD>`.
    Daily,

    /// The configured snapshot repository.
    Repository,

    None,
}

/// How a fetched document splits into entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entries {
    /// The root object, keyed by index name.
    Indices,

    /// An object member of the root, keyed by index name.
    Field(&'static str),

    /// A root array of row objects, each naming its index under `key`.
    Rows { key: &'static str },

    /// The whole document is one entry, labeled by the selector if it has one.
    Document,
}

/// A collector expressed as data: one document and the rules applied to each of its entries
#[derive(Debug)]
pub struct CollectorDef {
    pub name: &'static str,
    pub kind: DocumentKind,
    pub selector: Selector,
    pub entries: Entries,
    pub rules: &'static [ExtractionRule],
}

macro_rules! rule {
    ($metric:expr, $lookup:expr, $coerce:ident) => {
        rule!($metric, $lookup, $coerce, None, &[], Rollup::None)
    };
    ($metric:expr, $lookup:expr, $coerce:ident, $rollup:expr) => {
        rule!($metric, $lookup, $coerce, None, &[], $rollup)
    };
    ($metric:expr, $lookup:expr, $coerce:ident, $fallback:expr, $extra:expr, $rollup:expr) => {
        ExtractionRule {
            metric: &$metric,
            lookup: $lookup,
            coerce: coerce::$coerce,
            fallback: $fallback,
            extra_labels: $extra,
            rollup: $rollup,
        }
    };
}

pub static FIELDS: CollectorDef = CollectorDef {
    name: "fields",
    kind: DocumentKind::IndexMapping,
    selector: Selector::Daily,
    entries: Entries::Indices,
    rules: &[rule!(FIELDS_COUNT, Lookup::Entry, field_count, Rollup::Sum(&FIELDS_GROUP_COUNT))],
};

pub static INDICES: CollectorDef = CollectorDef {
    name: "indices",
    kind: DocumentKind::IndexStats,
    selector: Selector::Daily,
    entries: Entries::Field("indices"),
    rules: &[
        rule!(INDEX_DOCS, Lookup::Paths(&["primaries.indexing.index_total"]), number),
        rule!(
            INDEX_SIZE_PRIMARY,
            Lookup::Paths(&["primaries.store.size_in_bytes"]),
            number,
            Rollup::Growth(&INDEX_GROUP_SIZE)
        ),
        rule!(INDEX_SIZE_TOTAL, Lookup::Paths(&["total.store.size_in_bytes"]), number),
    ],
};

pub static SETTINGS: CollectorDef = CollectorDef {
    name: "settings",
    kind: DocumentKind::IndexSettings,
    selector: Selector::Daily,
    entries: Entries::Indices,
    rules: &[rule!(
        FIELDS_LIMIT,
        Lookup::Paths(&[
            "settings.index.mapping.total_fields.limit",
            "defaults.index.mapping.total_fields.limit"
        ]),
        numeric,
        Rollup::Sum(&FIELDS_GROUP_LIMIT)
    )],
};

pub static CLUSTER_SETTINGS: CollectorDef = CollectorDef {
    name: "cluster-settings",
    kind: DocumentKind::ClusterSettings,
    selector: Selector::None,
    entries: Entries::Document,
    rules: &[
        rule!(
            EXCLUDE_EXISTS,
            Lookup::Paths(&["persistent.cluster.routing.allocation.exclude"]),
            non_empty,
            Some(0.0),
            &["persistent"],
            Rollup::None
        ),
        rule!(
            EXCLUDE_EXISTS,
            Lookup::Paths(&["transient.cluster.routing.allocation.exclude"]),
            non_empty,
            Some(0.0),
            &["transient"],
            Rollup::None
        ),
        rule!(
            MAX_SHARDS_PER_NODE,
            Lookup::Paths(&["transient.cluster.max_shards_per_node", "persistent.cluster.max_shards_per_node"]),
            numeric,
            Some(1000.0),
            &[],
            Rollup::None
        ),
    ],
};

pub static SNAPSHOTS: CollectorDef = CollectorDef {
    name: "snapshots",
    kind: DocumentKind::SnapshotList,
    selector: Selector::Repository,
    entries: Entries::Document,
    rules: &[rule!(SNAPSHOTS_COUNT, Lookup::Paths(&["snapshots"]), array_len)],
};

pub static HEALTH: CollectorDef = CollectorDef {
    name: "health",
    kind: DocumentKind::IndexHealth,
    selector: Selector::Daily,
    entries: Entries::Field("indices"),
    rules: &[
        rule!(INDEX_HEALTH, Lookup::Paths(&["status"]), health_green, None, &["green"], Rollup::None),
        rule!(INDEX_HEALTH, Lookup::Paths(&["status"]), health_yellow, None, &["yellow"], Rollup::None),
        rule!(INDEX_HEALTH, Lookup::Paths(&["status"]), health_red, None, &["red"], Rollup::None),
        rule!(INDEX_SHARDS, Lookup::Paths(&["number_of_shards"]), number),
        rule!(INDEX_REPLICAS, Lookup::Paths(&["number_of_replicas"]), number),
    ],
};

pub static CAT_INDICES: CollectorDef = CollectorDef {
    name: "cat-indices",
    kind: DocumentKind::CatIndices,
    selector: Selector::Daily,
    entries: Entries::Rows { key: "index" },
    rules: &[
        rule!(CAT_SIZE_PRIMARY, Lookup::Key("pri.store.size"), size),
        rule!(CAT_DOCS, Lookup::Key("dc"), numeric),
    ],
};

/// Every collector, in registration order.
pub static COLLECTOR_DEFINITIONS: &[&CollectorDef] = &[&FIELDS, &INDICES, &SETTINGS, &CLUSTER_SETTINGS, &HEALTH, &SNAPSHOTS, &CAT_INDICES];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = COLLECTOR_DEFINITIONS.iter().map(|def| def.name).collect();
        assert_eq!(names.len(), COLLECTOR_DEFINITIONS.len());
    }

    #[test]
    fn test_rule_labels_fit_their_metrics() {
        for def in COLLECTOR_DEFINITIONS {
            let entry_labels = match (def.entries, def.selector) {
                (Entries::Document, Selector::Repository) => 1,
                (Entries::Document, _) => 0,
                _ => 2,
            };

            for rule in def.rules {
                assert_eq!(
                    entry_labels + rule.extra_labels.len(),
                    rule.metric.labels.len(),
                    "collector '{}' emits {} with the wrong number of labels",
                    def.name,
                    rule.metric.name
                );
            }
        }
    }

    #[test]
    fn test_rollups_target_group_metrics() {
        for def in COLLECTOR_DEFINITIONS {
            for rule in def.rules {
                if let Rollup::Sum(target) | Rollup::Growth(target) = rule.rollup {
                    assert_eq!(target.labels, &["index_group"], "{} rolls up into {}", rule.metric.name, target.name);
                }
            }
        }
    }
}
