pub mod formatter;

pub use formatter::{
    format_average, format_component_table, format_grade, format_issue, format_number,
    format_solution, format_weight_note, should_use_colors,
};
