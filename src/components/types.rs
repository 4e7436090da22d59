use anyhow::{bail, Result};
use std::fmt;

/// Stable identifier of a component within one store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Positional id used when a record arrives without one ("c-0", "c-1", ...)
    pub fn positional(index: usize) -> Self {
        Self(format!("c-{}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One weighted item of a grading scheme.
///
/// `grade` is `None` while the component is ungraded. Zero is a real grade
/// and must never stand in for "not graded yet".
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    pub weight: f64,
    pub grade: Option<f64>,
}

impl Component {
    pub fn new(id: ComponentId, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id,
            name: name.into(),
            weight: normalize_weight(weight),
            grade: None,
        }
    }

    pub fn with_grade(mut self, grade: f64) -> Self {
        self.grade = normalize_grade(Some(grade));
        self
    }

    /// Weight as the engine sees it: non-finite or negative weights count as 0
    pub fn effective_weight(&self) -> f64 {
        normalize_weight(self.weight)
    }

    /// The recorded grade, if it is a usable number
    pub fn graded_score(&self) -> Option<f64> {
        self.grade.filter(|g| g.is_finite())
    }
}

/// Placeholder label for the component at `index` (0-based)
pub fn placeholder_name(index: usize) -> String {
    format!("Component {}", index + 1)
}

pub(crate) fn normalize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

pub(crate) fn normalize_grade(grade: Option<f64>) -> Option<f64> {
    grade.filter(|g| g.is_finite())
}

/// A single field edit pushed into the store from the presentation side
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Name(String),
    Weight(f64),
    Grade(Option<f64>),
}

impl FieldEdit {
    /// Build an edit from raw text the way an editable row is read back:
    /// an unparseable weight becomes 0 and an empty grade means ungraded.
    pub fn parse(field: &str, raw: &str) -> Result<Self> {
        let raw = raw.trim();
        match field.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(FieldEdit::Name(raw.to_string())),
            "weight" => Ok(FieldEdit::Weight(raw.parse::<f64>().unwrap_or(0.0))),
            "grade" => {
                if raw.is_empty() || raw == "-" {
                    Ok(FieldEdit::Grade(None))
                } else {
                    match raw.parse::<f64>() {
                        Ok(g) if g.is_finite() => Ok(FieldEdit::Grade(Some(g))),
                        _ => bail!("Grade must be a number or empty, got '{}'", raw),
                    }
                }
            }
            other => bail!("Unknown field '{}'. Expected one of: name, weight, grade", other),
        }
    }
}
