//! Process settings: `.mednova/config.json` overlaid by environment variables.
//!
//! Loaded once at startup and handed to components by value. Nothing in the
//! workspace reads the environment after that point.

use std::path::PathBuf;

use serde::Deserialize;

use crate::paths::MednovaPaths;

pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_ENDPOINT: &str = "GEMINI_ENDPOINT";
pub const ENV_LIVEKIT_API_KEY: &str = "LIVEKIT_API_KEY";
pub const ENV_LIVEKIT_API_SECRET: &str = "LIVEKIT_API_SECRET";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Credentials and endpoints. Every field is optional; components decide
/// which ones they require.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub gemini_endpoint: Option<String>,
    #[serde(default)]
    pub livekit_api_key: Option<String>,
    #[serde(default)]
    pub livekit_api_secret: Option<String>,
}

impl Settings {
    /// Load from `.mednova/config.json` (optional) and the process environment.
    pub fn load(paths: &MednovaPaths) -> Result<Self, ConfigError> {
        Self::load_with(paths, |key| std::env::var(key).ok())
    }

    /// Same as [`Settings::load`] with an injectable environment lookup.
    pub fn load_with<F>(paths: &MednovaPaths, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::from_file(paths)?;
        settings.apply_env(env);
        Ok(settings)
    }

    fn from_file(paths: &MednovaPaths) -> Result<Self, ConfigError> {
        let path = &paths.config_json;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let settings = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(settings)
    }

    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|v| !v.is_empty());
        if let Some(v) = lookup(ENV_GEMINI_API_KEY) {
            self.gemini_api_key = Some(v);
        }
        if let Some(v) = lookup(ENV_GEMINI_ENDPOINT) {
            self.gemini_endpoint = Some(v);
        }
        if let Some(v) = lookup(ENV_LIVEKIT_API_KEY) {
            self.livekit_api_key = Some(v);
        }
        if let Some(v) = lookup(ENV_LIVEKIT_API_SECRET) {
            self.livekit_api_secret = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_file_is_empty() {
        let paths = MednovaPaths::discover("/nonexistent");
        let s = Settings::load_with(&paths, no_env).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn file_values_are_read() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = MednovaPaths::discover(tmp.path());
        paths.ensure_layout().unwrap();
        std::fs::write(
            &paths.config_json,
            r#"{"gemini_api_key":"file-key","livekit_api_key":"lk","unrelated":true}"#,
        )
        .unwrap();

        let s = Settings::load_with(&paths, no_env).unwrap();
        assert_eq!(s.gemini_api_key.as_deref(), Some("file-key"));
        assert_eq!(s.livekit_api_key.as_deref(), Some("lk"));
        assert!(s.gemini_endpoint.is_none());
    }

    #[test]
    fn env_overrides_file() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = MednovaPaths::discover(tmp.path());
        paths.ensure_layout().unwrap();
        std::fs::write(&paths.config_json, r#"{"gemini_api_key":"file-key"}"#).unwrap();

        let env: HashMap<&str, &str> = [
            (ENV_GEMINI_API_KEY, "env-key"),
            (ENV_LIVEKIT_API_SECRET, ""),
        ]
        .into_iter()
        .collect();
        let s = Settings::load_with(&paths, |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(s.gemini_api_key.as_deref(), Some("env-key"));
        // empty env values do not count
        assert!(s.livekit_api_secret.is_none());
    }

    #[test]
    fn malformed_file_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = MednovaPaths::discover(tmp.path());
        paths.ensure_layout().unwrap();
        std::fs::write(&paths.config_json, "{not json").unwrap();

        let err = Settings::load_with(&paths, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
