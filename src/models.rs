use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============ Backend Responses ============

/// Model description returned by `GET /meta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaResponse {
    /// Tag of the model currently served by the backend.
    #[serde(default)]
    pub model_tag: String,
    /// Ordered feature names the model expects. `null` when the backend has none.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// Free-form model metadata.
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl MetaResponse {
    /// Feature names, treating `null` as an empty list.
    pub fn feature_names(&self) -> &[String] {
        self.feature_names.as_deref().unwrap_or_default()
    }
}

/// Prediction returned by `POST /predict`.
///
/// The body is not schema-checked: any parseable JSON is accepted, the fields the
/// views read are picked out leniently, and `raw` keeps the body exactly as the
/// backend sent it for the raw-response view.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictResponse {
    /// Empty when the backend sent none.
    pub model_tag: String,
    /// Expected in [0, 1] but passed through unclamped. `None` when absent or not a number.
    pub risk_score: Option<f64>,
    /// Usually "low", "medium" or "high"; any backend label is accepted.
    pub risk_level: String,
    pub details: Option<Map<String, Value>>,
    /// The response body as received.
    pub raw: Value,
}

impl PredictResponse {
    /// Score formatted with three decimals, as shown next to the meter.
    pub fn score_text(&self) -> String {
        match self.risk_score {
            Some(score) => format!("{:.3}", score),
            None => "n/a".to_string(),
        }
    }
}

impl From<Value> for PredictResponse {
    fn from(raw: Value) -> Self {
        let model_tag = raw
            .get("model_tag")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let risk_score = raw.get("risk_score").and_then(Value::as_f64);
        let risk_level = match raw.get("risk_level") {
            Some(Value::String(level)) => level.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let details = raw.get("details").and_then(Value::as_object).cloned();

        Self {
            model_tag,
            risk_score,
            risk_level,
            details,
            raw,
        }
    }
}

// ============ Requests ============

/// A single coerced feature value.
///
/// Serialized untagged: numbers as JSON numbers, everything else as JSON strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(serde_json::Number),
    Text(String),
}

impl FeatureValue {
    pub fn is_number(&self) -> bool {
        matches!(self, FeatureValue::Number(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => n.as_f64(),
            FeatureValue::Text(_) => None,
        }
    }
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Feature name to value, in form order.
    pub features: serde_json::Map<String, Value>,
}

impl PredictRequest {
    pub fn new<I>(features: I) -> Self
    where
        I: IntoIterator<Item = (String, FeatureValue)>,
    {
        let features = features
            .into_iter()
            .map(|(name, value)| {
                let json = match value {
                    FeatureValue::Number(n) => Value::Number(n),
                    FeatureValue::Text(s) => Value::String(s),
                };
                (name, json)
            })
            .collect();
        Self { features }
    }
}

/// Error body returned by the backend on non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// The `detail` message, when the backend sent one as a string.
    pub fn message(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|d| d.as_str())
    }
}
