use super::collector::Collector;
use super::day::ScrapeDay;
use crate::Result;
use crate::client::DocumentSource;
use crate::metrics::{COLLECTOR_DURATION, COLLECTOR_SUCCESS, Observation, encode};
use std::collections::HashMap;
use std::time::Instant;

const LOG_TARGET: &str = "  exporter";

/// The outcome of one scrape across every registered collector
#[derive(Debug, Clone, Default)]
pub struct Scrape {
    pub observations: Vec<Observation>,
    pub failed: usize,
    pub total: usize,
}

impl Scrape {
    /// Whether there was at least one collector and none of them could fetch its document.
    #[must_use]
    pub const fn all_failed(&self) -> bool {
        self.total > 0 && self.failed == self.total
    }
}

/// Drives the registered collectors against one document source
#[derive(Debug)]
pub struct Exporter<S> {
    source: S,
    collectors: Vec<Collector>,
    const_labels: HashMap<String, String>,
}

impl<S: DocumentSource> Exporter<S> {
    #[must_use]
    pub fn new(source: S, const_labels: HashMap<String, String>) -> Self {
        Self {
            source,
            collectors: Vec::new(),
            const_labels,
        }
    }

    pub fn register(&mut self, collector: Collector) {
        log::debug!(target: LOG_TARGET, "Registered collector '{}'", collector.name());
        self.collectors.push(collector);
    }

    pub fn collector_names(&self) -> impl Iterator<Item = &'static str> {
        self.collectors.iter().map(Collector::name)
    }

    #[cfg(test)]
    #[must_use]
    pub const fn const_labels(&self) -> &HashMap<String, String> {
        &self.const_labels
    }

    /// Run every collector once, in registration order.
    ///
    /// A collector whose fetch fails contributes only its status samples; the others still report.
    pub async fn scrape(&mut self, day: &ScrapeDay) -> Scrape {
        let mut scrape = Scrape {
            total: self.collectors.len(),
            ..Scrape::default()
        };

        for collector in &mut self.collectors {
            let start = Instant::now();
            let success = match collector.collect(&self.source, day).await {
                Ok(observations) => {
                    scrape.observations.extend(observations);
                    1.0
                }
                Err(e) => {
                    log::error!(target: LOG_TARGET, "Collector '{}' failed: {e:#}", collector.name());
                    scrape.failed += 1;
                    0.0
                }
            };

            let labels = vec![collector.name().to_string()];
            scrape.observations.push(Observation::new(&COLLECTOR_SUCCESS, success, labels.clone()));
            scrape
                .observations
                .push(Observation::new(&COLLECTOR_DURATION, start.elapsed().as_secs_f64(), labels));
        }

        log::debug!(
            target: LOG_TARGET,
            "Scrape for {} produced {} observations, {} of {} collectors failed",
            day.stamp(),
            scrape.observations.len(),
            scrape.failed,
            scrape.total
        );

        scrape
    }

    /// Render a scrape in the text exposition format with this exporter's constant labels.
    pub fn render(&self, scrape: &Scrape) -> Result<String> {
        encode(&scrape.observations, &self.const_labels)
    }
}
