use crate::document::{SizeParseError, walk};
use crate::metrics::MetricDef;
use core::fmt::{Display, Formatter};
use serde_json::Value;

/// Where a rule finds its raw value inside one entry
#[derive(Debug, Clone, Copy)]
pub enum Lookup {
    /// The entry itself.
    Entry,

    /// The first dotted path that resolves to a non-null value.
    Paths(&'static [&'static str]),

    /// A literal member of the entry, for keys that themselves contain dots.
    Key(&'static str),
}

impl Lookup {
    fn resolve<'a>(&self, entry: &'a Value) -> Option<&'a Value> {
        match *self {
            Self::Entry => Some(entry),
            Self::Paths(paths) => paths.iter().find_map(|path| walk(entry, path).filter(|v| !v.is_null())),
            Self::Key(key) => entry.get(key).filter(|v| !v.is_null()),
        }
    }
}

impl Display for Lookup {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match *self {
            Self::Entry => write!(f, "<entry>"),
            Self::Paths(paths) => write!(f, "{}", paths.join(" | ")),
            Self::Key(key) => write!(f, "{key}"),
        }
    }
}

/// Derived group-level metric fed by a per-index rule
#[derive(Debug, Clone, Copy)]
pub enum Rollup {
    None,

    /// Sum of the per-index values within each group.
    Sum(&'static MetricDef),

    /// Sum of each index's growth since the previous scrape.
    Growth(&'static MetricDef),
}

/// Why a raw value could not be turned into a sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    WrongType,
    Size(SizeParseError),
}

pub type Coercion = fn(&Value) -> Result<f64, CoercionError>;

/// Why a rule produced no sample for an entry
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    NotFound { path: String },
    InvalidValue { path: String, value: Value },
    Size { path: String, source: SizeParseError },
}

impl Display for ExtractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "'{path}' not found"),
            Self::InvalidValue { path, value } => write!(f, "'{path}' has unexpected value {value}"),
            Self::Size { path, source } => write!(f, "'{path}': {source}"),
        }
    }
}

impl core::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Size { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// One (lookup, metric, coercion) row of a collector's table
#[derive(Debug)]
pub struct ExtractionRule {
    pub metric: &'static MetricDef,
    pub lookup: Lookup,
    pub coerce: Coercion,

    /// Value used when the lookup finds nothing.
    pub fallback: Option<f64>,

    /// Label values appended after the entry's own labels.
    pub extra_labels: &'static [&'static str],

    pub rollup: Rollup,
}

impl ExtractionRule {
    pub fn evaluate(&self, entry: &Value) -> Result<f64, ExtractError> {
        let Some(raw) = self.lookup.resolve(entry) else {
            return self.fallback.ok_or_else(|| ExtractError::NotFound {
                path: self.lookup.to_string(),
            });
        };

        (self.coerce)(raw).map_err(|e| match e {
            CoercionError::WrongType => ExtractError::InvalidValue {
                path: self.lookup.to_string(),
                value: raw.clone(),
            },
            CoercionError::Size(source) => ExtractError::Size {
                path: self.lookup.to_string(),
                source,
            },
        })
    }
}

pub mod coerce {
    use super::CoercionError;
    use crate::document::{count_fields, normalize_size};
    use serde_json::Value;

    #[expect(clippy::cast_precision_loss, reason = "metric samples are f64")]
    const fn as_f64(n: u64) -> f64 {
        n as f64
    }

    /// A JSON number.
    pub fn number(value: &Value) -> Result<f64, CoercionError> {
        value.as_f64().ok_or(CoercionError::WrongType)
    }

    /// A finite JSON number, or a string holding one.
    pub fn numeric(value: &Value) -> Result<f64, CoercionError> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        parsed.filter(|v| v.is_finite()).ok_or(CoercionError::WrongType)
    }

    /// A human-readable size string such as `12gb`.
    pub fn size(value: &Value) -> Result<f64, CoercionError> {
        let s = value.as_str().ok_or(CoercionError::WrongType)?;
        normalize_size(s).map(as_f64).map_err(CoercionError::Size)
    }

    /// The number of fields declared by a mapping object.
    pub fn field_count(value: &Value) -> Result<f64, CoercionError> {
        if value.is_object() {
            Ok(as_f64(count_fields(value)))
        } else {
            Err(CoercionError::WrongType)
        }
    }

    /// The length of an array.
    pub fn array_len(value: &Value) -> Result<f64, CoercionError> {
        value
            .as_array()
            .map(|a| as_f64(a.len() as u64))
            .ok_or(CoercionError::WrongType)
    }

    /// 1 for a non-empty object or string, 0 otherwise.
    pub fn non_empty(value: &Value) -> Result<f64, CoercionError> {
        let present = match value {
            Value::Object(map) => !map.is_empty(),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            _ => false,
        };

        Ok(if present { 1.0 } else { 0.0 })
    }

    fn color(value: &Value, wanted: &str) -> Result<f64, CoercionError> {
        let status = value.as_str().ok_or(CoercionError::WrongType)?;
        Ok(if status.eq_ignore_ascii_case(wanted) { 1.0 } else { 0.0 })
    }

    pub fn health_green(value: &Value) -> Result<f64, CoercionError> {
        color(value, "green")
    }

    pub fn health_yellow(value: &Value) -> Result<f64, CoercionError> {
        color(value, "yellow")
    }

    pub fn health_red(value: &Value) -> Result<f64, CoercionError> {
        color(value, "red")
    }
}
