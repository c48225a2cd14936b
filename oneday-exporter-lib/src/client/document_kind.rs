use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use strum::{Display, EnumIter};

/// Characters escaped when a selector is placed in a URL path segment.
///
/// Wildcards and comma-separated lists must reach the cluster intact.
const SELECTOR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b',')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// The documents the cluster API can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum DocumentKind {
    IndexStats,
    IndexMapping,
    IndexSettings,
    ClusterSettings,
    SnapshotList,
    IndexHealth,
    CatIndices,
    ClusterInfo,
}

impl DocumentKind {
    /// The request path and query for this kind, relative to the cluster's base URL.
    #[must_use]
    pub fn endpoint(self, selector: &str) -> String {
        let selector = utf8_percent_encode(selector, SELECTOR);

        match self {
            Self::IndexStats => format!("{selector}/_stats"),
            Self::IndexMapping => format!("{selector}/_mapping"),
            Self::IndexSettings => format!("{selector}/_settings?include_defaults=true"),
            Self::ClusterSettings => "_cluster/settings".to_string(),
            Self::SnapshotList => format!("_snapshot/{selector}/*"),
            Self::IndexHealth => format!("_cluster/health/{selector}?level=indices"),
            Self::CatIndices => format!("_cat/indices/{selector}?format=json&h=index,dc,pri.store.size"),
            Self::ClusterInfo => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_is_kebab_case() {
        assert_eq!(DocumentKind::IndexStats.to_string(), "index-stats");
        assert_eq!(DocumentKind::ClusterSettings.to_string(), "cluster-settings");
        assert_eq!(DocumentKind::CatIndices.to_string(), "cat-indices");
    }

    #[test]
    fn test_daily_selector_is_not_escaped() {
        assert_eq!(DocumentKind::IndexStats.endpoint("*-2021.12.02"), "*-2021.12.02/_stats");
        assert_eq!(
            DocumentKind::IndexHealth.endpoint("*-2021.12.02"),
            "_cluster/health/*-2021.12.02?level=indices"
        );
    }

    #[test]
    fn test_selector_is_escaped() {
        assert_eq!(DocumentKind::SnapshotList.endpoint("my repo/x"), "_snapshot/my%20repo%2Fx/*");
    }

    #[test]
    fn test_selector_free_kinds() {
        assert_eq!(DocumentKind::ClusterSettings.endpoint("ignored"), "_cluster/settings");
        assert_eq!(DocumentKind::ClusterInfo.endpoint("ignored"), "");
    }

    #[test]
    fn test_every_kind_has_a_distinct_endpoint() {
        let endpoints: std::collections::HashSet<_> = DocumentKind::iter().map(|kind| kind.endpoint("x")).collect();
        assert_eq!(endpoints.len(), DocumentKind::iter().count());
    }
}
