use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;

/// A point on the earth's surface in decimal degrees
///
/// Ranges are not checked; out-of-range values still produce a
/// (meaningless) distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Customer as read from one line of the data source
///
/// `user_id` and `name` must be present for the line to parse at all.
/// Coordinates are kept raw and only checked when the record is filtered,
/// so a bad coordinate is a per-record fault rather than a per-line one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub latitude: Value,
    #[serde(default)]
    pub longitude: Value,
    /// Any other keys on the line, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomerRecord {
    /// Resolve the record's coordinate
    ///
    /// Accepts JSON numbers and numeric strings (`"52.986375"`).
    pub fn coordinate(&self) -> Result<Coordinate, RecordError> {
        Ok(Coordinate::new(
            numeric_field("latitude", &self.latitude)?,
            numeric_field("longitude", &self.longitude)?,
        ))
    }
}

fn numeric_field(field: &'static str, value: &Value) -> Result<f64, RecordError> {
    let not_numeric = || RecordError::NotNumeric {
        field,
        value: value.to_string(),
    };

    match value {
        Value::Null => Err(RecordError::MissingField { field }),
        Value::Number(n) => n.as_f64().ok_or_else(not_numeric),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| not_numeric()),
        _ => Err(not_numeric()),
    }
}

/// Projection of a customer that passed the distance filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibleCustomer {
    pub user_id: i64,
    pub name: String,
}

impl From<&CustomerRecord> for EligibleCustomer {
    fn from(record: &CustomerRecord) -> Self {
        Self {
            user_id: record.user_id,
            name: record.name.clone(),
        }
    }
}
