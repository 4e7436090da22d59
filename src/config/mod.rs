mod schema;

pub use schema::{Config, ExtractionConfig, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_TIMEOUT_SECS};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/grade-calc/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("grade-calc"))
}

/// Get the default config file path (~/.config/grade-calc/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Directory holding one JSON slot per course
pub fn get_courses_dir(config: &Config) -> Result<PathBuf> {
    match &config.storage_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(get_config_dir()?.join("courses")),
    }
}

/// Ensure a directory exists
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory at {}", dir.display()))?;
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/grade-calc/config.yaml), and a missing default file yields
///   the default configuration.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    if config_content.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!("Failed to parse config: invalid YAML in {}", config_path.display())
    })?;

    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref course) = config.default_course {
        if course.trim().is_empty() {
            errors.push("default_course: must not be blank".to_string());
        }
    }

    if let Some(ref endpoint) = config.extraction.endpoint {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            errors.push(format!(
                "extraction.endpoint: '{}' must start with http:// or https://",
                endpoint
            ));
        }
    }

    if config.extraction.max_upload_bytes == 0 {
        errors.push("extraction.max_upload_bytes: must be positive".to_string());
    }

    if config.extraction.timeout_secs == 0 {
        errors.push("extraction.timeout_secs: must be positive".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
