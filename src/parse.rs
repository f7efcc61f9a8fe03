use serde_json::Value;

use crate::error::StrategyError;
use crate::strategy::{strategy_output_typedef, StrategyResult};
use crate::types::validate;

/// Remove markdown code fences (```json ... ``` or ``` ... ```) around a JSON
/// payload. Clean input comes back unchanged apart from outer whitespace.
pub fn strip_code_fences(response: &str) -> &str {
    let mut cleaned = response.trim();

    if let Some(rest) = cleaned.strip_prefix("```") {
        // Skip an optional language tag such as `json`.
        let tag_end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        cleaned = &rest[tag_end..];
    }

    if let Some(rest) = cleaned.trim_end().strip_suffix("```") {
        cleaned = rest;
    }

    cleaned.trim()
}

/// Decode and validate the model's text into a [`StrategyResult`].
pub fn parse_strategy_response(text: &str) -> Result<StrategyResult, StrategyError> {
    let cleaned = strip_code_fences(text);

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| StrategyError::response_format(format!("LLM did not return valid JSON: {e}")))?;

    validate(&strategy_output_typedef(), &value).map_err(|errors| {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        StrategyError::response_format(joined)
    })?;

    serde_json::from_value(value).map_err(|e| StrategyError::response_format(e.to_string()))
}
