use chrono::{Local, NaiveDate};

/// The calendar day a scrape is scoped to
///
/// Its stamp is both the suffix of the wildcard selector sent to the cluster and the suffix
/// stripped from index names to find their group, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeDay {
    stamp: String,
}

impl ScrapeDay {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            stamp: date.format("%Y.%m.%d").to_string(),
        }
    }

    /// The current local day.
    #[must_use]
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    /// The date as `YYYY.MM.DD`.
    #[must_use]
    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    /// The wildcard selector matching every index of this day.
    #[must_use]
    pub fn selector(&self) -> String {
        format!("*-{}", self.stamp)
    }

    /// Whether `index` matches [`Self::selector`].
    #[must_use]
    pub fn matches(&self, index: &str) -> bool {
        index
            .strip_suffix(self.stamp.as_str())
            .is_some_and(|rest| rest.ends_with('-'))
    }

    #[must_use]
    pub fn group_of(&self, index: &str) -> String {
        index_group(index, &self.stamp)
    }
}

/// Derive an index's group by stripping the `-<today>` suffix and lower-casing the rest.
///
/// Names without the suffix form their own group.
#[must_use]
pub fn index_group(index: &str, today: &str) -> String {
    let suffix = format!("-{today}");
    index.strip_suffix(suffix.as_str()).unwrap_or(index).to_lowercase()
}
