use crate::components::{Component, ComponentId};

/// Outcome of solving for the final component.
///
/// `required` is the raw algebraic value. It is not clamped: above 100 means
/// the target is out of reach, below 0 means it is already secured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequiredScore {
    pub required: Option<f64>,
    pub weight_final: f64,
    pub sum_known: f64,
    pub total_weight: f64,
}

/// How a required score reads on the usual 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outlook {
    OutOfReach,
    AlreadySecured,
    Attainable,
}

impl Outlook {
    pub fn of(required: f64) -> Self {
        if required > 100.0 {
            Outlook::OutOfReach
        } else if required < 0.0 {
            Outlook::AlreadySecured
        } else {
            Outlook::Attainable
        }
    }
}

/// Sum of every component weight
pub fn total_weight(components: &[Component]) -> f64 {
    components.iter().map(Component::effective_weight).sum()
}

/// Weighted average over graded components only.
///
/// Returns `None` when the graded components carry no weight (nothing graded
/// yet, or every graded component has weight 0). The result is not clamped to
/// 0-100.
pub fn weighted_average_so_far(components: &[Component]) -> Option<f64> {
    let (sum, weight_sum) = components
        .iter()
        .filter_map(|c| c.graded_score().map(|g| (g, c.effective_weight())))
        .fold((0.0, 0.0), |(sum, weight_sum), (grade, weight)| {
            (sum + grade * weight, weight_sum + weight)
        });

    if weight_sum == 0.0 {
        return None;
    }
    Some(sum / weight_sum).filter(|avg| avg.is_finite())
}

/// Score needed on the final component to finish at `target_overall`.
///
/// `required = (target * total_weight - sum_known) / weight_final`, where
/// `sum_known` covers graded non-final components. Ungraded non-final
/// components add nothing to `sum_known` but their weight still counts in
/// `total_weight`. The final component's own grade, if any, is ignored.
///
/// `required` is `None` when the total weight is not positive, no final
/// component is selected, the final component has no weight, or the target
/// is not a finite number.
pub fn required_final_score(
    components: &[Component],
    final_id: Option<&ComponentId>,
    target_overall: f64,
) -> RequiredScore {
    let total_weight = total_weight(components);
    let mut sum_known = 0.0;
    let mut weight_final = 0.0;

    for component in components {
        if final_id == Some(&component.id) {
            weight_final += component.effective_weight();
        } else if let Some(grade) = component.graded_score() {
            sum_known += grade * component.effective_weight();
        }
    }

    let required = if total_weight > 0.0 && weight_final > 0.0 && target_overall.is_finite() {
        Some((target_overall * total_weight - sum_known) / weight_final).filter(|r| r.is_finite())
    } else {
        None
    };

    RequiredScore {
        required,
        weight_final,
        sum_known,
        total_weight,
    }
}
