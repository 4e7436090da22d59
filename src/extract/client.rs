use super::response::parse_extraction_response;
use crate::components::RawComponent;
use crate::config::ExtractionConfig;
use anyhow::{bail, Context, Result};
use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::time::Duration;

/// Client for the syllabus-parsing service.
///
/// Sends the raw document as a multipart `file` field and expects
/// `{ "components": [{ "name": ..., "weight": ... }] }` back.
pub struct SyllabusClient {
    http: reqwest::Client,
    endpoint: String,
    max_upload_bytes: u64,
}

impl SyllabusClient {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let Some(endpoint) = config.endpoint.clone() else {
            bail!("No extraction endpoint configured. Set extraction.endpoint in config.yaml");
        };
        let http = reqwest::Client::builder()
            .user_agent(concat!("grade-calc/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            endpoint,
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload a document and return the extracted seed records
    pub async fn extract(&self, file_name: &str, bytes: Vec<u8>) -> Result<Vec<RawComponent>> {
        check_upload_size(bytes.len() as u64, self.max_upload_bytes)?;

        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Failed to reach extraction service at {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Backend error: {}", status.as_u16());
        }

        let body = response
            .text()
            .await
            .context("Failed to read extraction response")?;

        parse_extraction_response(&body)
    }
}

/// Read a document from disk, refusing anything over the upload limit
pub fn read_document(path: &Path, max_upload_bytes: u64) -> Result<Vec<u8>> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    check_upload_size(metadata.len(), max_upload_bytes)?;
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn check_upload_size(len: u64, max: u64) -> Result<()> {
    if len == 0 {
        bail!("Document is empty");
    }
    if len > max {
        bail!("Document is {} bytes, over the {} byte upload limit", len, max);
    }
    Ok(())
}
