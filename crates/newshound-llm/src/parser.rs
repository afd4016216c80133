//! Parse LLM responses into field → expression maps.

use crate::LlmError;
use newshound_domain::{Field, FieldSet};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Parse a JSON object response into a field → string map.
///
/// Tolerant by design: markdown code fences are stripped, field names are
/// matched case-insensitively, unknown keys and non-string values are
/// skipped with a warning. Only a response that is not a JSON object at
/// all is an error.
pub fn parse_field_map(response: &str) -> Result<BTreeMap<Field, String>, LlmError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| LlmError::InvalidResponse(format!("JSON parse error: {e}")))?;

    let object = json
        .as_object()
        .ok_or_else(|| LlmError::InvalidResponse("Expected JSON object".to_string()))?;

    let mut map = BTreeMap::new();
    for (key, value) in object {
        let Ok(field) = key.parse::<Field>() else {
            warn!(key, "skipping unknown field in response");
            continue;
        };
        let Some(text) = value.as_str() else {
            warn!(key, "skipping non-string value in response");
            continue;
        };
        map.insert(field, text.trim().to_string());
    }
    Ok(map)
}

/// Parse an initial-proposal response into a full field set, with empty
/// strings for anything the model failed to propose.
pub fn parse_field_set(response: &str) -> Result<FieldSet<String>, LlmError> {
    let map = parse_field_map(response)?;
    Ok(FieldSet::from_fn(|field| {
        map.get(&field).cloned().unwrap_or_default()
    }))
}

/// Extract JSON from a response, handling markdown code blocks.
fn extract_json(response: &str) -> Result<String, LlmError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(LlmError::InvalidResponse("Empty code block".to_string()));
        }
        // Skip the opening fence line and a trailing fence if present.
        let end = if lines.last().map(|l| l.trim_start().starts_with("```")) == Some(true) {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}
