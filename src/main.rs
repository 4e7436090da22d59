use clap::{Parser, Subcommand};
use grade_calc::components::{from_seed_records, FieldEdit};
use grade_calc::courses::CourseSnapshot;
use grade_calc::grading::solve_for_final;
use grade_calc::session::{CourseSession, Edit};
use std::path::{Path, PathBuf};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_STORAGE: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show components and the running average (default if no subcommand)
    Show,
    /// Append a component
    Add {
        /// Display name (defaults to "Component N")
        name: Option<String>,
        /// Weight in percentage points
        #[arg(short, long)]
        weight: Option<f64>,
        /// Grade already achieved
        #[arg(short, long)]
        grade: Option<f64>,
    },
    /// Edit one field of a component by its index number
    Set {
        /// Index number of the component (1-based, as shown in the table)
        index: usize,
        /// Field to edit: name, weight or grade
        field: String,
        /// New value; leave empty to clear a grade
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// Mark the component you still have to sit as the final
    Final {
        /// Index number of the component (1-based)
        index: Option<usize>,
        /// Unmark the current final component
        #[arg(long, conflicts_with = "index")]
        clear: bool,
    },
    /// Remove a component by its index number
    Remove {
        index: usize,
    },
    /// Score needed on the final component to reach a target overall grade
    Target {
        /// Target overall grade in percent
        #[arg(allow_negative_numbers = true)]
        percent: Option<f64>,
    },
    /// Replace the components with a syllabus breakdown (JSON file or document)
    Import {
        path: PathBuf,
    },
    /// Print the saved course as JSON
    Export,
    /// Delete the saved data for the course
    Clear,
}

#[derive(Parser, Debug)]
#[command(name = "grade-calc")]
#[command(about = "Weighted course grade tracker", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/grade-calc/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Course to work on (defaults to default_course from config)
    #[arg(long, global = true)]
    course: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Failed to install rustls crypto provider");
        std::process::exit(EXIT_NETWORK);
    }

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Show);
    let verbose = cli.verbose;

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match grade_calc::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = grade_calc::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let courses_dir = match grade_calc::config::get_courses_dir(&config) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let course = match cli.course.or_else(|| config.default_course.clone()) {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            eprintln!("No course selected.");
            eprintln!("Pass --course \"<name>\" or set default_course in ~/.config/grade-calc/config.yaml");
            std::process::exit(EXIT_INPUT);
        }
    };

    if verbose {
        eprintln!("Course: {}", course);
        eprintln!(
            "Slot: {}",
            grade_calc::courses::course_path(&courses_dir, &course).display()
        );
    }

    // Clearing must work even when the saved data is unreadable
    if let Commands::Clear = command {
        match grade_calc::courses::clear_course(&courses_dir, &course) {
            Ok(true) => println!("Cleared saved data for \"{}\".", course),
            Ok(false) => println!("No saved data found for \"{}\".", course),
            Err(e) => {
                eprintln!("{:#}", e);
                std::process::exit(EXIT_STORAGE);
            }
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let mut session = match CourseSession::open(&courses_dir, &course) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{:#}", e);
            eprintln!("Run `grade-calc --course \"{}\" clear` to start over.", course);
            std::process::exit(EXIT_STORAGE);
        }
    };

    if verbose {
        eprintln!("Loaded {} components", session.store.len());
        if let Some(saved_at) = session.saved_at {
            eprintln!("Last saved {}", saved_at.to_rfc3339());
        }
    }

    let use_colors = grade_calc::output::should_use_colors();

    let edit = match command {
        Commands::Show => None,
        Commands::Add { name, weight, grade } => Some(Edit::Add { name, weight, grade }),
        Commands::Set { index, field, value } => {
            match FieldEdit::parse(&field, value.as_deref().unwrap_or("")) {
                Ok(edit) => Some(Edit::Set { index, edit }),
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_INPUT);
                }
            }
        }
        Commands::Final { index, clear } => match (index, clear) {
            (_, true) => Some(Edit::ClearFinal),
            (Some(index), false) => Some(Edit::MarkFinal(index)),
            (None, false) => {
                eprintln!("Give the index of the final component, or --clear.");
                std::process::exit(EXIT_INPUT);
            }
        },
        Commands::Remove { index } => Some(Edit::Remove(index)),
        Commands::Import { path } => {
            let store = match import_breakdown(&path, &config, verbose).await {
                Ok(store) => store,
                Err(e) => {
                    eprintln!("{:#}", e);
                    eprintln!("Could not parse syllabus. You can always enter/edit rows by hand.");
                    std::process::exit(EXIT_INPUT);
                }
            };
            if store.is_empty() {
                eprintln!("No grading components found in {}.", path.display());
                std::process::exit(EXIT_INPUT);
            }
            Some(Edit::Replace(store))
        }
        Commands::Target { percent } => {
            println!("{}", session.render(use_colors));
            println!();
            match solve_for_final(&session.store, percent) {
                Ok(solution) => {
                    if verbose {
                        eprintln!(
                            "total weight {}, known {}, final weight {}",
                            solution.result.total_weight,
                            solution.result.sum_known,
                            solution.result.weight_final
                        );
                    }
                    println!("{}", grade_calc::output::format_solution(&solution, use_colors));
                    std::process::exit(EXIT_SUCCESS);
                }
                Err(issue) => {
                    println!("{}", grade_calc::output::format_issue(issue, use_colors));
                    std::process::exit(EXIT_INPUT);
                }
            }
        }
        Commands::Export => {
            let snapshot = CourseSnapshot::from_store(&session.store);
            match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Failed to serialize course: {}", e);
                    std::process::exit(EXIT_STORAGE);
                }
            }
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::Clear => None,
    };

    if let Some(edit) = edit {
        if let Err(e) = session.apply(edit) {
            eprintln!("{}", e);
            std::process::exit(EXIT_INPUT);
        }
        match session.save() {
            Ok(path) => {
                if verbose {
                    eprintln!("Saved {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("{:#}", e);
                std::process::exit(EXIT_STORAGE);
            }
        }
    }

    println!("{}", session.render(use_colors));

    std::process::exit(EXIT_SUCCESS);
}

/// Build a fresh store from a seed file (.json) or by sending a document to
/// the extraction service
async fn import_breakdown(
    path: &Path,
    config: &grade_calc::config::Config,
    verbose: bool,
) -> anyhow::Result<grade_calc::components::ComponentStore> {
    use anyhow::Context;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let records = if is_json {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        grade_calc::extract::parse_seed_records(&text)?
    } else {
        let client = grade_calc::extract::SyllabusClient::new(&config.extraction)?;
        let bytes = grade_calc::extract::read_document(path, config.extraction.max_upload_bytes)?;
        if verbose {
            eprintln!("Sending {} bytes to {}", bytes.len(), client.endpoint());
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("syllabus");
        client.extract(file_name, bytes).await?
    };

    if verbose {
        eprintln!("Extracted {} components", records.len());
    }

    Ok(from_seed_records(&records))
}
