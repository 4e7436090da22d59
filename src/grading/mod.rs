pub mod engine;
pub mod validation;

pub use engine::{required_final_score, total_weight, weighted_average_so_far, Outlook, RequiredScore};
pub use validation::{solve_for_final, weight_total_mismatch, Solution, SolveIssue, EXPECTED_TOTAL_WEIGHT};
