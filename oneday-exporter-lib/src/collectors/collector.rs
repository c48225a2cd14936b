use super::collector_def::{CollectorDef, Entries, Selector};
use super::day::ScrapeDay;
use super::delta::DeltaAccumulator;
use super::rule::Rollup;
use crate::Result;
use crate::client::DocumentSource;
use crate::metrics::{MetricDef, Observation};
use ohno::{EnrichableExt, app_err};
use serde_json::Value;
use std::collections::BTreeMap;

const LOG_TARGET: &str = " collector";

/// One unit of a fetched document that the rules are applied to
struct Entry<'a> {
    index: Option<&'a str>,
    group: Option<String>,
    labels: Vec<String>,
    value: &'a Value,
}

/// A registered collector: its definition plus the state it carries between scrapes
#[derive(Debug)]
pub struct Collector {
    def: &'static CollectorDef,
    accumulator: DeltaAccumulator,
    repository: Option<String>,
}

impl Collector {
    #[must_use]
    pub fn new(def: &'static CollectorDef) -> Self {
        Self {
            def,
            accumulator: DeltaAccumulator::new(),
            repository: None,
        }
    }

    /// A collector whose selector is the given snapshot repository.
    #[must_use]
    pub fn with_repository(def: &'static CollectorDef, repository: impl Into<String>) -> Self {
        Self {
            repository: Some(repository.into()),
            ..Self::new(def)
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.def.name
    }

    #[cfg(test)]
    #[must_use]
    pub const fn accumulator(&self) -> &DeltaAccumulator {
        &self.accumulator
    }

    fn selector(&self, day: &ScrapeDay) -> Result<String> {
        match self.def.selector {
            Selector::Daily => Ok(day.selector()),
            Selector::Repository => self
                .repository
                .clone()
                .ok_or_else(|| app_err!("collector '{}' needs a snapshot repository", self.def.name)),
            Selector::None => Ok(String::new()),
        }
    }

    /// Fetch this collector's document and extract its observations.
    ///
    /// A fetch failure is returned as an error; problems with individual entries are logged and skipped.
    pub async fn collect<S: DocumentSource>(&mut self, source: &S, day: &ScrapeDay) -> Result<Vec<Observation>> {
        let selector = self.selector(day)?;

        let doc = source
            .fetch(self.def.kind, &selector)
            .await
            .map_err(|e| e.enrich_with(|| format!("fetching {} for '{selector}'", self.def.kind)))?;

        Ok(self.extract(&doc, day, &selector))
    }

    /// Apply the rules to every entry of an already fetched document.
    pub fn extract(&mut self, doc: &Value, day: &ScrapeDay, selector: &str) -> Vec<Observation> {
        let mut observations = Vec::new();
        let mut groups: BTreeMap<(&'static str, String), (&'static MetricDef, f64)> = BTreeMap::new();

        for entry in self.entries(doc, day, selector) {
            for rule in self.def.rules {
                let value = match rule.evaluate(entry.value) {
                    Ok(value) => value,
                    Err(e) => {
                        log::error!(
                            target: LOG_TARGET,
                            "{}: skipping {} for {}: {e}",
                            self.def.name,
                            rule.metric.name,
                            entry.index.unwrap_or(selector)
                        );
                        continue;
                    }
                };

                let mut labels = entry.labels.clone();
                labels.extend(rule.extra_labels.iter().map(ToString::to_string));
                observations.push(Observation::new(rule.metric, value, labels));

                let (Some(index), Some(group)) = (entry.index, &entry.group) else {
                    continue;
                };

                let (target, amount) = match rule.rollup {
                    Rollup::None => continue,
                    Rollup::Sum(target) => (target, value),
                    Rollup::Growth(target) => (target, self.accumulator.observe(index, value)),
                };

                groups.entry((target.name, group.clone())).or_insert((target, 0.0)).1 += amount;
            }
        }

        observations.extend(
            groups
                .into_iter()
                .map(|((_, group), (def, total))| Observation::new(def, total, vec![group])),
        );

        observations
    }

    fn entries<'a>(&self, doc: &'a Value, day: &ScrapeDay, selector: &str) -> Vec<Entry<'a>> {
        let named: Vec<(&'a str, &'a Value)> = match self.def.entries {
            Entries::Indices => self.members(Some(doc)),
            Entries::Field(field) => self.members(doc.get(field)),
            Entries::Rows { key } => self.rows(doc, key),
            Entries::Document => {
                let labels = match self.def.selector {
                    Selector::Repository => vec![selector.to_owned()],
                    Selector::Daily | Selector::None => Vec::new(),
                };

                return vec![Entry {
                    index: None,
                    group: None,
                    labels,
                    value: doc,
                }];
            }
        };

        named
            .into_iter()
            .filter(|(index, _)| {
                let wanted = self.def.selector != Selector::Daily || day.matches(index);
                if !wanted {
                    log::debug!(target: LOG_TARGET, "{}: ignoring {index}, it does not match {selector}", self.def.name);
                }
                wanted
            })
            .map(|(index, value)| {
                let group = day.group_of(index);
                Entry {
                    index: Some(index),
                    labels: vec![index.to_owned(), group.clone()],
                    group: Some(group),
                    value,
                }
            })
            .collect()
    }

    fn members<'a>(&self, value: Option<&'a Value>) -> Vec<(&'a str, &'a Value)> {
        match value.and_then(Value::as_object) {
            Some(map) => map.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            None => {
                log::error!(target: LOG_TARGET, "{}: expected an object keyed by index name", self.def.name);
                Vec::new()
            }
        }
    }

    fn rows<'a>(&self, doc: &'a Value, key: &str) -> Vec<(&'a str, &'a Value)> {
        let Some(rows) = doc.as_array() else {
            log::error!(target: LOG_TARGET, "{}: expected an array of rows", self.def.name);
            return Vec::new();
        };

        rows.iter()
            .filter_map(|row| {
                let index = row.get(key).and_then(Value::as_str);
                if index.is_none() {
                    log::error!(target: LOG_TARGET, "{}: row without '{key}': {row}", self.def.name);
                }
                index.map(|index| (index, row))
            })
            .collect()
    }
}
