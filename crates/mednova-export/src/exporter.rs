//! One-shot export of a patient record to the generation API.
//!
//! The exporter sends exactly one request per call. There is no timeout, no
//! retry and no streaming; the caller's task is suspended until the whole
//! response body has arrived.

use std::path::Path;

use mednova_core::types::Patient;
use mednova_core::{write_atomic, Settings};
use serde_json::Value;

use crate::prompt::build_request;

pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no Gemini API key configured (set GEMINI_API_KEY or `mednova config set gemini_api_key ...`)")]
    MissingCredential,
    #[error("generation API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("response is not JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Bearer credential and target URL, fixed at construction time.
#[derive(Clone)]
pub struct ExportConfig {
    pub api_key: String,
    pub endpoint: String,
}

impl ExportConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ExportError> {
        let key = settings
            .gemini_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ExportError::MissingCredential)?;
        let mut config = Self::new(key);
        if let Some(endpoint) = settings.gemini_endpoint.as_deref() {
            config.endpoint = endpoint.to_string();
        }
        Ok(config)
    }
}

// Keep the key out of debug output.
impl std::fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

pub struct ReportExporter {
    config: ExportConfig,
    client: reqwest::Client,
}

impl ReportExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Use a caller-built client (proxy or TLS settings).
    pub fn with_client(config: ExportConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Send `patient` to the generation API and save the raw JSON reply to
    /// `output_path`, replacing any existing file.
    ///
    /// On a non-success status the error is returned before anything touches
    /// `output_path`: a missing file stays missing, an existing one keeps its
    /// bytes.
    pub async fn export(&self, patient: &Patient, output_path: &Path) -> Result<Value, ExportError> {
        let request = build_request(patient);
        tracing::info!(patient = %patient.id, endpoint = %self.config.endpoint, "sending patient summary");

        let resp = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            // keep the read failure as the body text rather than losing it
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            tracing::warn!(status = status.as_u16(), "generation API rejected request");
            return Err(ExportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let data: Value = serde_json::from_slice(&bytes)?;

        let pretty = serde_json::to_string_pretty(&data)?;
        write_atomic(output_path, pretty.as_bytes())?;
        tracing::info!(path = %output_path.display(), bytes = pretty.len(), "response saved");

        Ok(data)
    }
}
