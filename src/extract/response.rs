use crate::components::{records_from_value, RawComponent};
use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Parse the extraction service's reply, which must be `{ "components": [...] }`
pub fn parse_extraction_response(body: &str) -> Result<Vec<RawComponent>> {
    let value: Value =
        serde_json::from_str(body).context("Extraction response is not valid JSON")?;
    match value.get("components") {
        Some(list) if list.is_array() => records_from_value(list),
        _ => bail!("Response does not contain components."),
    }
}

/// Lenient parse of seed records as a language model or a user might write
/// them: a bare list or the `{ "components": [...] }` envelope, optionally
/// wrapped in a Markdown code fence.
pub fn parse_seed_records(text: &str) -> Result<Vec<RawComponent>> {
    let value: Value = match serde_json::from_str(text.trim()) {
        Ok(v) => v,
        Err(_) => serde_json::from_str(strip_code_fences(text).as_str())
            .context("Seed records are not valid JSON")?,
    };

    match &value {
        Value::Array(_) => records_from_value(&value),
        Value::Object(_) => match value.get("components") {
            Some(list) if list.is_array() => records_from_value(list),
            _ => bail!("Response does not contain components."),
        },
        _ => bail!("Response does not contain components."),
    }
}

fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}
