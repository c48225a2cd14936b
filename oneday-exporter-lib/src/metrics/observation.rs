use super::MetricDef;

/// One labeled sample produced by a collector during a scrape
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub def: &'static MetricDef,
    pub value: f64,
    pub labels: Vec<String>,
}

impl Observation {
    #[must_use]
    pub fn new(def: &'static MetricDef, value: f64, labels: Vec<String>) -> Self {
        debug_assert_eq!(
            labels.len(),
            def.labels.len(),
            "label values do not match the label names of {}",
            def.name
        );

        Self { def, value, labels }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.def.name
    }

    /// The value of the label called `name`, if this metric carries it.
    #[must_use]
    pub fn label(&self, name: &str) -> Option<&str> {
        self.def
            .labels
            .iter()
            .position(|label| *label == name)
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }
}
