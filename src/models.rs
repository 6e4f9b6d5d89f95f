use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The four morphological inputs sent to the prediction service.
///
/// Values are carried as-is: no clamping, no rounding. Non-finite values
/// serialize as JSON `null`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Measurements {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

/// Range the input widgets display. Purely advisory.
pub const DISPLAY_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

impl Default for Measurements {
    fn default() -> Self {
        Measurements {
            sepal_length: 5.1,
            sepal_width: 3.5,
            petal_length: 1.4,
            petal_width: 0.2,
        }
    }
}

impl Measurements {
    pub fn new(sepal_length: f64, sepal_width: f64, petal_length: f64, petal_width: f64) -> Self {
        Measurements {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        }
    }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::SepalLength => self.sepal_length,
            Field::SepalWidth => self.sepal_width,
            Field::PetalLength => self.petal_length,
            Field::PetalWidth => self.petal_width,
        }
    }

    pub fn set(&mut self, field: Field, value: f64) {
        let slot = match field {
            Field::SepalLength => &mut self.sepal_length,
            Field::SepalWidth => &mut self.sepal_width,
            Field::PetalLength => &mut self.petal_length,
            Field::PetalWidth => &mut self.petal_width,
        };
        *slot = value;
    }

    /// Fields whose value falls outside [`DISPLAY_RANGE`] or is not a number.
    pub fn out_of_range(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|&field| !DISPLAY_RANGE.contains(&self.get(field)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    SepalLength,
    SepalWidth,
    PetalLength,
    PetalWidth,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::SepalLength,
        Field::SepalWidth,
        Field::PetalLength,
        Field::PetalWidth,
    ];

    /// Key used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            Field::SepalLength => "sepal_length",
            Field::SepalWidth => "sepal_width",
            Field::PetalLength => "petal_length",
            Field::PetalWidth => "petal_width",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::SepalLength => "Sepal Length (cm)",
            Field::SepalWidth => "Sepal Width (cm)",
            Field::PetalLength => "Petal Length (cm)",
            Field::PetalWidth => "Petal Width (cm)",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field `{0}`")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Coerces raw form input to a number.
///
/// Blank input becomes `0.0`, anything unparsable becomes `NaN`.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Body returned by the prediction service on success.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionResponse {
    pub species: String,
    pub proba: BTreeMap<String, f64>,
    /// Any other top-level fields the service sends, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PredictionResponse {
    /// Largest value in `proba`, regardless of which class `species` names.
    ///
    /// Returns `0.0` for an empty mapping. `NaN` entries are ignored.
    pub fn max_probability(&self) -> f64 {
        self.proba
            .values()
            .copied()
            .filter(|p| !p.is_nan())
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Class probabilities, highest first. Ties keep class-name order.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> =
            self.proba.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }
}

/// A response enriched with client-side data at capture time.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PredictionRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub response: PredictionResponse,
    pub timestamp: String,
    pub confidence: f64,
}

impl PredictionRecord {
    pub fn capture(response: PredictionResponse) -> Self {
        let timestamp = Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string();
        Self::with_timestamp(response, timestamp)
    }

    pub fn with_timestamp(response: PredictionResponse, timestamp: String) -> Self {
        let confidence = response.max_probability();
        PredictionRecord {
            id: Uuid::new_v4(),
            response,
            timestamp,
            confidence,
        }
    }

    pub fn species(&self) -> &str {
        &self.response.species
    }

    pub fn proba(&self) -> &BTreeMap<String, f64> {
        &self.response.proba
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(species: &str, proba: &[(&str, f64)]) -> PredictionResponse {
        PredictionResponse {
            species: species.to_string(),
            proba: proba.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            extra: Default::default(),
        }
    }

    #[test]
    fn confidence_is_max_over_all_classes() {
        // species disagrees with the argmax; confidence still follows the max
        let resp = response("setosa", &[("setosa", 0.2), ("virginica", 0.7), ("versicolor", 0.1)]);
        let record = PredictionRecord::capture(resp);
        assert_eq!(record.confidence, 0.7);
    }

    #[test]
    fn empty_proba_has_zero_confidence() {
        assert_eq!(response("setosa", &[]).max_probability(), 0.0);
    }

    #[test]
    fn ranked_orders_by_probability() {
        let resp = response("a", &[("a", 0.1), ("b", 0.6), ("c", 0.3)]);
        let names: Vec<&str> = resp.ranked().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn coerce_number_mirrors_form_input() {
        assert_eq!(coerce_number("4.2"), 4.2);
        assert_eq!(coerce_number(" 7 "), 7.0);
        assert_eq!(coerce_number(""), 0.0);
        assert!(coerce_number("abc").is_nan());
    }

    #[test]
    fn capture_stamps_local_time() {
        let record = PredictionRecord::capture(response("setosa", &[("setosa", 1.0)]));
        assert!(!record.timestamp.is_empty());
        let parsed =
            chrono::NaiveDateTime::parse_from_str(&record.timestamp, "%m/%d/%Y, %I:%M:%S %p");
        assert!(parsed.is_ok(), "unexpected timestamp {:?}", record.timestamp);
    }

    #[test]
    fn field_parses_from_wire_key() {
        assert_eq!("petal_width".parse::<Field>(), Ok(Field::PetalWidth));
        assert!("petal".parse::<Field>().is_err());
    }

    #[test]
    fn nan_serializes_as_null() {
        let m = Measurements::new(f64::NAN, 3.5, 1.4, 0.2);
        let json = serde_json::to_value(m).unwrap();
        assert!(json["sepal_length"].is_null());
        assert_eq!(json["petal_width"], 0.2);
        assert_eq!(m.out_of_range(), vec![Field::SepalLength]);
    }

    #[test]
    fn response_keeps_unknown_fields() {
        let body = r#"{"species":"setosa","proba":{"setosa":1.0},"model":"v2"}"#;
        let resp: PredictionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.extra["model"], "v2");
    }
}
