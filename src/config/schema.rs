use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default cap on documents sent for extraction (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Top-level configuration.
///
/// Example YAML:
/// ```yaml
/// default_course: "MATH 101"
/// extraction:
///   endpoint: "https://grade-calculator-backend.onrender.com/parse-syllabus"
///   max_upload_bytes: 5242880
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Course used when `--course` is not given
    #[serde(default)]
    pub default_course: Option<String>,

    /// Where course slots are stored (defaults to ~/.config/grade-calc/courses)
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,

    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Syllabus extraction service settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Full URL that accepts a multipart `file` upload
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
