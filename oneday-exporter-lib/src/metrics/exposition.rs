use super::{MetricDef, MetricKind, Observation};
use crate::Result;
use ohno::IntoAppError;
use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Content type of the text exposition format.
#[must_use]
pub fn content_type() -> String {
    TextEncoder::new().format_type().to_string()
}

/// Render a scrape's observations in the Prometheus text exposition format.
///
/// A fresh registry is built per call, so only metrics observed in this scrape appear.
/// `const_labels` are attached to every metric.
pub fn encode(observations: &[Observation], const_labels: &HashMap<String, String>) -> Result<String> {
    let registry = Registry::new();
    let mut gauges: HashMap<&'static str, GaugeVec> = HashMap::new();
    let mut counters: HashMap<&'static str, CounterVec> = HashMap::new();

    for obs in observations {
        let labels: Vec<&str> = obs.labels.iter().map(String::as_str).collect();

        match obs.def.kind {
            MetricKind::Gauge => {
                let vec = match gauges.entry(obs.def.name) {
                    Entry::Occupied(e) => e.into_mut(),
                    Entry::Vacant(e) => {
                        let vec = GaugeVec::new(opts(obs.def, const_labels), obs.def.labels)
                            .into_app_err_with(|| format!("creating gauge {}", obs.def.name))?;
                        registry
                            .register(Box::new(vec.clone()))
                            .into_app_err_with(|| format!("registering gauge {}", obs.def.name))?;
                        e.insert(vec)
                    }
                };

                vec.get_metric_with_label_values(&labels)
                    .into_app_err_with(|| format!("labeling gauge {}", obs.def.name))?
                    .set(obs.value);
            }

            MetricKind::Counter => {
                let vec = match counters.entry(obs.def.name) {
                    Entry::Occupied(e) => e.into_mut(),
                    Entry::Vacant(e) => {
                        let vec = CounterVec::new(opts(obs.def, const_labels), obs.def.labels)
                            .into_app_err_with(|| format!("creating counter {}", obs.def.name))?;
                        registry
                            .register(Box::new(vec.clone()))
                            .into_app_err_with(|| format!("registering counter {}", obs.def.name))?;
                        e.insert(vec)
                    }
                };

                vec.get_metric_with_label_values(&labels)
                    .into_app_err_with(|| format!("labeling counter {}", obs.def.name))?
                    .inc_by(obs.value.max(0.0));
            }
        }
    }

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .into_app_err("encoding metrics")?;

    String::from_utf8(buffer).into_app_err("encoding metrics as UTF-8")
}

fn opts(def: &MetricDef, const_labels: &HashMap<String, String>) -> Opts {
    Opts::new(def.full_name(), def.help).const_labels(const_labels.clone())
}
