use super::engine::{required_final_score, total_weight, RequiredScore};
use crate::components::{Component, ComponentStore};
use std::fmt;

/// Weight total a well-formed grading scheme adds up to
pub const EXPECTED_TOTAL_WEIGHT: f64 = 100.0;

/// Why the solver could not produce a required score.
/// Each variant carries its own user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveIssue {
    MissingTarget,
    NoFinalComponent,
    NonPositiveTotalWeight,
    ZeroFinalWeight,
    TargetOutOfRange,
}

impl fmt::Display for SolveIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SolveIssue::MissingTarget => "Enter a target overall grade first.",
            SolveIssue::NoFinalComponent => {
                "Mark one component as your Final / remaining component."
            }
            SolveIssue::NonPositiveTotalWeight => {
                "Weights sum to zero. Check that your syllabus weights are correct."
            }
            SolveIssue::ZeroFinalWeight => {
                "The final component has no weight, so no score on it can move your overall grade."
            }
            SolveIssue::TargetOutOfRange => {
                "That target is too large to work out a required score. Enter a realistic percentage."
            }
        };
        f.write_str(msg)
    }
}

/// A solved target: which component it is for and what it needs
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<'a> {
    pub target: f64,
    pub component: &'a Component,
    pub required: f64,
    pub result: RequiredScore,
}

/// Check solver preconditions in the order a user would fix them, then solve.
pub fn solve_for_final(store: &ComponentStore, target: Option<f64>) -> Result<Solution<'_>, SolveIssue> {
    let target = target
        .filter(|t| t.is_finite())
        .ok_or(SolveIssue::MissingTarget)?;
    let component = store.final_component().ok_or(SolveIssue::NoFinalComponent)?;

    let result = required_final_score(store.components(), store.final_id(), target);
    if result.total_weight <= 0.0 {
        return Err(SolveIssue::NonPositiveTotalWeight);
    }
    if result.weight_final <= 0.0 {
        return Err(SolveIssue::ZeroFinalWeight);
    }
    let required = result.required.ok_or(SolveIssue::TargetOutOfRange)?;

    Ok(Solution {
        target,
        component,
        required,
        result,
    })
}

/// The weight total when it differs from 100. The engine still works with any
/// positive total; this is for warning the user.
pub fn weight_total_mismatch(components: &[Component]) -> Option<f64> {
    if components.is_empty() {
        return None;
    }
    let total = total_weight(components);
    ((total - EXPECTED_TOTAL_WEIGHT).abs() >= 1e-6).then_some(total)
}
