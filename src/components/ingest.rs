use super::store::ComponentStore;
use super::types::{placeholder_name, Component, ComponentId};
use anyhow::{bail, Result};
use serde_json::Value;

/// A component record as it arrives from outside: an extraction result or a
/// saved course. Every field is optional and loosely typed until ingested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawComponent {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub weight: Option<Value>,
    pub grade: Option<Value>,
    pub is_final: Option<Value>,
}

impl RawComponent {
    /// Pick the known fields out of a JSON value. Non-object values yield an
    /// empty record, which ingestion then fills with defaults.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).filter(|v| !v.is_null()).cloned();
        Self {
            id: field("id"),
            name: field("name"),
            weight: field("weight"),
            grade: field("grade"),
            is_final: field("isFinal"),
        }
    }

    /// Seed record with just a name and weight
    pub fn seed(name: &str, weight: f64) -> Self {
        Self {
            name: Some(Value::from(name)),
            weight: Some(Value::from(weight)),
            ..Self::default()
        }
    }
}

/// Read a JSON array of component records
pub fn records_from_value(value: &Value) -> Result<Vec<RawComponent>> {
    match value.as_array() {
        Some(items) => Ok(items.iter().map(RawComponent::from_value).collect()),
        None => bail!("Expected a list of components"),
    }
}

/// Turn extracted `{name, weight}` seeds into fresh, ungraded components
pub fn from_seed_records(records: &[RawComponent]) -> ComponentStore {
    let components = records
        .iter()
        .enumerate()
        .map(|(idx, record)| base_component(idx, record))
        .collect();
    ComponentStore::from_components(components)
}

/// Rebuild a store from saved records.
///
/// Applies the same defaults as seed ingestion, keeps grades, and restores the
/// final selection from the first record flagged `isFinal`.
pub fn from_persisted_records(records: &[RawComponent]) -> ComponentStore {
    let mut final_index = None;
    let components = records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            if final_index.is_none() && record.is_final.as_ref().is_some_and(truthy) {
                final_index = Some(idx);
            }
            let mut component = base_component(idx, record);
            component.grade = record.grade.as_ref().and_then(coerce_grade);
            component
        })
        .collect();

    let mut store = ComponentStore::from_components(components);
    if let Some(id) = final_index.and_then(|idx| store.id_at(idx + 1).cloned()) {
        store.set_final(&id);
    }
    store
}

fn base_component(idx: usize, record: &RawComponent) -> Component {
    let id = record
        .id
        .as_ref()
        .and_then(coerce_text)
        .map(ComponentId::new)
        .unwrap_or_else(|| ComponentId::positional(idx));
    let name = record
        .name
        .as_ref()
        .and_then(coerce_text)
        .unwrap_or_else(|| placeholder_name(idx));
    let weight = record.weight.as_ref().and_then(coerce_number).unwrap_or(0.0);
    Component::new(id, name, weight)
}

/// Non-empty text from a string or number value
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Finite number from a number, numeric string, or boolean
fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Grades keep the empty-string sentinel as ungraded; booleans are not grades
fn coerce_grade(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::Bool(_) => None,
        other => coerce_number(other),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
