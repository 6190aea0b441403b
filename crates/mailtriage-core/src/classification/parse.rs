//! Strict validation of the model reply.

use super::model::{Category, ClassificationResult, FailureReason, Urgency};
use serde_json::{Map, Value};
use tracing::debug;

const CATEGORY_KEY: &str = "categorie";
const URGENCY_KEY: &str = "urgence";
const SYNTHESIS_KEY: &str = "synthese";

/// Parses a raw model reply into a [`ClassificationResult`].
///
/// The reply must be exactly one JSON object (surrounding whitespace
/// allowed) with string fields `categorie`, `urgence` and `synthese`.
/// Extra keys are ignored. Structural problems and a blank synthesis yield
/// [`FailureReason::MalformedOutput`]; a well-formed reply with a tag
/// outside the closed sets yields [`FailureReason::InvalidEnumValue`].
#[must_use]
pub fn parse_reply(raw: &str) -> ClassificationResult {
    let object = match serde_json::from_str::<Value>(raw.trim()) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            debug!(kind = json_kind(&other), "reply is not a JSON object");
            return ClassificationResult::failed(FailureReason::MalformedOutput);
        }
        Err(e) => {
            debug!("reply is not JSON: {e}");
            return ClassificationResult::failed(FailureReason::MalformedOutput);
        }
    };

    let (Some(category), Some(urgency), Some(synthesis)) = (
        string_field(&object, CATEGORY_KEY),
        string_field(&object, URGENCY_KEY),
        string_field(&object, SYNTHESIS_KEY),
    ) else {
        debug!("reply lacks a required string field");
        return ClassificationResult::failed(FailureReason::MalformedOutput);
    };

    let synthesis = synthesis.trim();
    if synthesis.is_empty() {
        debug!("reply has a blank synthesis");
        return ClassificationResult::failed(FailureReason::MalformedOutput);
    }

    match (Category::from_tag(category), Urgency::from_tag(urgency)) {
        (Some(category), Some(urgency)) => ClassificationResult::Classified {
            category,
            urgency,
            synthesis: synthesis.to_string(),
        },
        _ => {
            debug!(category, urgency, "reply uses an unknown tag");
            ClassificationResult::failed(FailureReason::InvalidEnumValue)
        }
    }
}

fn string_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key)?.as_str()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
