use serde_json::{Map, Value, json};

use crate::{
    error::{Result, SummaryError},
    types::StructuredSummary,
};

/// JSON schema of [`StructuredSummary`] as sent to providers.
pub fn summary_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": {
                "type": "string",
                "description": "Overview paragraph of the video"
            },
            "smartSections": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "timestamp": { "type": "string", "description": "MM:SS" },
                        "emoji": { "type": "string" },
                        "title": { "type": "string" },
                        "isAd": { "type": "boolean" }
                    },
                    "required": ["timestamp", "emoji", "title", "isAd"]
                }
            },
            "metadata": {
                "type": "object",
                "properties": {
                    "summaryLength": { "type": "string", "enum": ["short", "long"] },
                    "videoTitle": { "type": "string" }
                },
                "required": ["summaryLength"]
            }
        },
        "required": ["summary", "smartSections"]
    })
}

/// Gemini's schema dialect spells types in upper case (`OBJECT`, `STRING`).
pub fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(fields) => {
            let mut converted = Map::with_capacity(fields.len());
            for (key, value) in fields {
                let value = match (key.as_str(), value) {
                    ("type", Value::String(t)) => Value::String(t.to_uppercase()),
                    // property names are user data, only their schemas convert
                    ("properties", Value::Object(props)) => Value::Object(
                        props
                            .iter()
                            .map(|(name, s)| (name.clone(), to_gemini_schema(s)))
                            .collect(),
                    ),
                    _ => to_gemini_schema(value),
                };
                converted.insert(key.clone(), value);
            }
            Value::Object(converted)
        }
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

/// Parse and validate raw structured output.
pub fn parse_structured(raw: &str) -> Result<StructuredSummary> {
    let body = strip_code_fence(raw);
    let summary: StructuredSummary = serde_json::from_str(body)
        .map_err(|e| SummaryError::SchemaValidation(e.to_string()))?;

    for (i, section) in summary.smart_sections.iter().enumerate() {
        if section.title.trim().is_empty() {
            return Err(SummaryError::SchemaValidation(format!(
                "smartSections[{i}] has an empty title"
            )));
        }
        if section.timestamp.trim().is_empty() {
            return Err(SummaryError::SchemaValidation(format!(
                "smartSections[{i}] has an empty timestamp"
            )));
        }
    }

    // Order is the provider's responsibility; flag it but keep it.
    let seconds: Vec<Option<u32>> = summary
        .smart_sections
        .iter()
        .map(|s| timestamp_seconds(&s.timestamp))
        .collect();
    if seconds
        .windows(2)
        .any(|w| matches!((w[0], w[1]), (Some(a), Some(b)) if b < a))
    {
        tracing::warn!("Smart sections are not in chronological order");
    }

    Ok(summary)
}

/// `MM:SS` or `H:MM:SS` to seconds. `None` when unparsable or out of range.
pub fn timestamp_seconds(timestamp: &str) -> Option<u32> {
    let parts: Vec<u32> = timestamp
        .trim()
        .split(':')
        .map(|p| p.parse::<u32>().ok())
        .collect::<Option<_>>()?;

    let (h, m, s) = match parts.as_slice() {
        [m, s] => (0, *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return None,
    };
    h.checked_mul(3600)?
        .checked_add(m.checked_mul(60)?)?
        .checked_add(s)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
