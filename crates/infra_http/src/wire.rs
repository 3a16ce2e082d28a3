//! Upstream payload shapes

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use domain_submission::{Assessment, AssessmentOutcome};

/// Collection listings come back either bare or wrapped
///
/// The body is read into a `serde_json::Value` first and the items are
/// deserialized from there. Untagged buffering cannot replay `null` into
/// `deserialize_option`, which the optional financial figures rely on.
#[derive(Debug)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

const WRAPPER_KEYS: [&str; 3] = ["data", "items", "results"];

impl<'de, T: DeserializeOwned> Deserialize<'de> for ListEnvelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = |value: Value| -> Result<Vec<T>, D::Error> {
            Vec::<T>::deserialize(value).map_err(de::Error::custom)
        };

        match Value::deserialize(deserializer)? {
            array @ Value::Array(_) => items(array).map(ListEnvelope::Bare),
            Value::Object(mut fields) => {
                let list = WRAPPER_KEYS
                    .iter()
                    .find_map(|key| fields.remove(*key))
                    .ok_or_else(|| de::Error::missing_field("data"))?;
                items(list).map(|data| ListEnvelope::Wrapped { data })
            }
            other => Err(de::Error::invalid_type(
                de::Unexpected::Other(json_kind(&other)),
                &"a list or an object wrapping a list",
            )),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<T> ListEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}

/// Body of `POST /auth/login`
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "token", alias = "access_token")]
    pub auth_token: String,
}

/// Assessment fields some responses carry
#[derive(Debug, Default, Deserialize)]
pub struct OutcomeFields {
    #[serde(default)]
    pub assessment: Option<Assessment>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub issue_date: Option<DateTime<Utc>>,
}

impl OutcomeFields {
    /// Parses an optional outcome from a response body
    ///
    /// Empty bodies and bodies without an `assessment` yield `None`.
    pub fn parse(body: &str) -> Result<Option<AssessmentOutcome>, serde_json::Error> {
        if body.trim().is_empty() {
            return Ok(None);
        }
        let value: serde_json::Value = serde_json::from_str(body)?;
        if !value.is_object() {
            return Ok(None);
        }
        let fields: OutcomeFields = serde_json::from_value(value)?;
        Ok(fields.assessment.map(|assessment| AssessmentOutcome {
            assessment,
            explanation: fields.explanation.unwrap_or_default(),
            issue_date: fields.issue_date,
        }))
    }
}

/// Best human-readable message in an error body
pub fn upstream_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "detail", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        reason.unwrap_or("Upstream error").to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}
