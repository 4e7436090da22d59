use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::components::ComponentStore;
use crate::grading::{Outlook, Solution, SolveIssue, EXPECTED_TOTAL_WEIGHT};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a number without trailing zeros ("50", "12.5", "33.33")
pub fn format_number(n: f64) -> String {
    let s = format!("{:.2}", n);
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Grade cell: the number, or "-" while ungraded
pub fn format_grade(grade: Option<f64>) -> String {
    match grade {
        Some(g) => format_number(g),
        None => "-".to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the component table with columns: Index, Name, Weight, Grade, Final
/// Index column: 3 chars (fits "99."), right-aligned
pub fn format_component_table(store: &ComponentStore, use_colors: bool) -> String {
    if store.is_empty() {
        return "No components yet. Import a syllabus or add rows manually.".to_string();
    }

    let weight_width = 7;
    let grade_width = 7;
    let separator = "  ";
    // index + space + weight + grade + marker + separators
    let fixed_width = 3 + 1 + weight_width + grade_width + 7 + separator.len() * 3;

    let longest = store
        .components()
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0);
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        Some(_) => longest.min(20),
        None => longest,
    };

    store
        .components()
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let index_str = format!("{:>2}.", idx + 1);
            let name = truncate_name(&c.name, name_width);
            let name_padded = format!("{:<width$}", name, width = name_width);
            let weight_str = format!("{:>width$}", format!("{}%", format_number(c.weight)), width = weight_width);
            let grade_str = format!("{:>width$}", format_grade(c.grade), width = grade_width);
            let marker = if store.is_final(&c.id) { "[final]" } else { "" };

            let line = if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    name_padded.bold(),
                    separator,
                    weight_str.cyan(),
                    separator,
                    grade_str,
                    separator,
                    marker.yellow()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, name_padded, separator, weight_str, separator, grade_str, separator, marker
                )
            };
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Running average line, or a prompt to enter grades when nothing is graded
pub fn format_average(average: Option<f64>, use_colors: bool) -> String {
    match average {
        None => "Enter some grades to see your current weighted average (based on completed components).".to_string(),
        Some(avg) => {
            let value = format!("{:.2}%", avg);
            if use_colors {
                format!("Current weighted average (completed only): {}", value.green().bold())
            } else {
                format!("Current weighted average (completed only): {}", value)
            }
        }
    }
}

/// Warning shown when the weights don't add up to 100
pub fn format_weight_note(total: f64) -> String {
    format!(
        "Note: weights add up to {}, not {}. Results use the weights as entered.",
        format_number(total),
        format_number(EXPECTED_TOTAL_WEIGHT)
    )
}

/// Explain a solved target, including whether it is out of reach or secured
pub fn format_solution(solution: &Solution, use_colors: bool) -> String {
    let required = format!("{:.2}%", solution.required);
    let required = if use_colors {
        match Outlook::of(solution.required) {
            Outlook::OutOfReach => required.red().bold().to_string(),
            Outlook::AlreadySecured => required.green().bold().to_string(),
            Outlook::Attainable => required.bold().to_string(),
        }
    } else {
        required
    };

    let mut msg = format!(
        "To finish with {:.2}%, you need about {} on \"{}\" (weight {}%).",
        solution.target,
        required,
        solution.component.name,
        format_number(solution.result.weight_final)
    );

    match Outlook::of(solution.required) {
        Outlook::OutOfReach => {
            msg.push_str(" This is above 100%, so that target is mathematically out of reach.")
        }
        Outlook::AlreadySecured => {
            msg.push_str(" This is below 0%, so you already have enough to reach that target.")
        }
        Outlook::Attainable => {}
    }
    msg
}

/// Solver precondition failure as shown to the user
pub fn format_issue(issue: SolveIssue, use_colors: bool) -> String {
    if use_colors {
        issue.to_string().red().to_string()
    } else {
        issue.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Component, ComponentId};
    use crate::grading::solve_for_final;

    fn sample_store() -> ComponentStore {
        let mut store = ComponentStore::from_components(vec![
            Component::new(ComponentId::new("a"), "Assignments", 20.0).with_grade(80.0),
            Component::new(ComponentId::new("b"), "Midterm", 30.0).with_grade(90.0),
            Component::new(ComponentId::new("c"), "Final", 50.0),
        ]);
        store.set_final(&ComponentId::new("c"));
        store
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(50.0), "50");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(33.333), "33.33");
        assert_eq!(format_number(-0.001), "0");
    }

    #[test]
    fn test_format_table_empty() {
        let result = format_component_table(&ComponentStore::new(), false);
        assert!(result.starts_with("No components yet"));
    }

    #[test]
    fn test_format_table_rows() {
        let result = format_component_table(&sample_store(), false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(" 1. Assignments"));
        assert!(lines[0].contains("20%"));
        assert!(lines[0].contains("80"));
        assert!(lines[1].contains("Midterm"));
        assert!(lines[2].contains("-"));
        assert!(lines[2].ends_with("[final]"));
        assert!(!lines[0].contains("[final]"));
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Participation", 8), "Parti...");
        assert_eq!(truncate_name("Lab", 8), "Lab");
        assert_eq!(truncate_name("Quizzes", 2), "Qu");
    }

    #[test]
    fn test_format_average() {
        assert_eq!(
            format_average(Some(86.0), false),
            "Current weighted average (completed only): 86.00%"
        );
        assert!(format_average(None, false).starts_with("Enter some grades"));
    }

    #[test]
    fn test_format_solution_attainable() {
        let store = sample_store();
        let solution = solve_for_final(&store, Some(85.0)).unwrap();
        assert_eq!(
            format_solution(&solution, false),
            "To finish with 85.00%, you need about 84.00% on \"Final\" (weight 50%)."
        );
    }

    #[test]
    fn test_format_solution_out_of_reach() {
        let store = sample_store();
        let solution = solve_for_final(&store, Some(101.0)).unwrap();
        let msg = format_solution(&solution, false);
        assert!(msg.contains("116.00%"));
        assert!(msg.contains("out of reach"));
    }

    #[test]
    fn test_format_solution_secured() {
        let store = sample_store();
        let solution = solve_for_final(&store, Some(30.0)).unwrap();
        assert!(format_solution(&solution, false).contains("already have enough"));
    }

    #[test]
    fn test_format_weight_note() {
        assert_eq!(
            format_weight_note(90.0),
            "Note: weights add up to 90, not 100. Results use the weights as entered."
        );
    }
}
