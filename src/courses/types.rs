use crate::components::{from_persisted_records, records_from_value, ComponentStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// On-disk form of one course slot: `{ "components": [...] }`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSnapshot {
    pub components: Vec<PersistedComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedComponent {
    pub id: String,
    pub name: String,
    pub weight: f64,
    /// `""` while ungraded, otherwise the number
    #[serde(serialize_with = "serialize_grade")]
    pub grade: Option<f64>,
    pub is_final: bool,
}

fn serialize_grade<S: Serializer>(grade: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match grade {
        Some(g) => serializer.serialize_f64(*g),
        None => serializer.serialize_str(""),
    }
}

/// A course read back from its slot
#[derive(Debug, Clone, PartialEq)]
pub struct SavedCourse {
    pub store: ComponentStore,
    pub saved_at: Option<DateTime<Utc>>,
}

impl CourseSnapshot {
    pub fn from_store(store: &ComponentStore) -> Self {
        let components = store
            .components()
            .iter()
            .map(|c| PersistedComponent {
                id: c.id.to_string(),
                name: c.name.clone(),
                weight: c.weight,
                grade: c.grade,
                is_final: store.is_final(&c.id),
            })
            .collect();
        Self {
            components,
            saved_at: None,
        }
    }

    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.saved_at = Some(at);
        self
    }
}

/// Rebuild a course from its JSON document.
///
/// A missing `components` list means an empty course; a `components` value
/// that is not a list is an error.
pub fn restore_course(value: &Value) -> Result<SavedCourse> {
    let records = match value.get("components") {
        None | Some(Value::Null) => Vec::new(),
        Some(list) => records_from_value(list).context("Saved course has an invalid component list")?,
    };
    let saved_at = value
        .get("savedAt")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Ok(SavedCourse {
        store: from_persisted_records(&records),
        saved_at,
    })
}
