use std::collections::HashMap;

/// Tracks the last size seen per index and reports how much each index grew since.
///
/// One accumulator belongs to one collector and lives as long as the process, so
/// growth is measured between consecutive scrapes.
#[derive(Debug, Default, Clone)]
pub struct DeltaAccumulator {
    last_seen: HashMap<String, f64>,
}

impl DeltaAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current` for `index` and return the growth since the previous observation.
    ///
    /// The first observation of an index returns zero. Shrinkage is clamped to zero.
    pub fn observe(&mut self, index: &str, current: f64) -> f64 {
        match self.last_seen.insert(index.to_owned(), current) {
            Some(last) => (current - last).max(0.0),
            None => 0.0,
        }
    }

    /// The last size recorded for `index`.
    #[cfg(test)]
    #[must_use]
    pub fn last_seen(&self, index: &str) -> Option<f64> {
        self.last_seen.get(index).copied()
    }

    #[cfg(test)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}
