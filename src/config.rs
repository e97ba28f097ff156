//! Configuration
//!
//! Settings are resolved in three layers, later layers winning:
//! 1. Built-in defaults
//! 2. YAML file at `$CHECKIN_CONFIG`, or `./checkin.yaml`
//! 3. `CHECKIN_*` environment variables
//!
//! # Example file
//!
//! ```yaml
//! api_base_url: https://portal.example.edu/api
//! username: jane.doe
//! request_timeout_secs: 15
//! ```

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Default portal API location for local development.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Lazily-resolved path of the settings file.
pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| match std::env::var("CHECKIN_CONFIG") {
    Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
    _ => PathBuf::from("checkin.yaml"),
});

/// Runtime settings for the check-in client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the portal REST API
    pub api_base_url: String,

    /// Signed-in portal username
    pub username: Option<String>,

    /// Bearer token sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            username: None,
            token: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Loads settings from `path` (or [`CONFIG_PATH`]) and the environment.
    ///
    /// A missing file falls back to defaults; an unreadable or malformed
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.unwrap_or(CONFIG_PATH.as_path());
        let mut settings = Self::from_file(path)?;
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Reads a YAML settings file.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        if !path.exists() {
            debug!("No settings file at {}; using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            format!("Failed to read settings file '{}': {}", path.display(), e)
        })?;

        let settings: Settings = serde_yaml::from_str(&content).map_err(|e| {
            format!("Failed to parse settings file '{}': {}", path.display(), e)
        })?;

        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Applies `CHECKIN_*` overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CHECKIN_API_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("CHECKIN_USERNAME") {
            self.username = Some(v);
        }
        if let Some(v) = lookup("CHECKIN_TOKEN") {
            self.token = Some(v);
        }
        if let Some(v) = lookup("CHECKIN_TIMEOUT_SECS") {
            match v.parse() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(_) => warn!("Ignoring invalid CHECKIN_TIMEOUT_SECS value: {}", v),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.request_timeout_secs, 30);
        assert!(settings.username.is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::from_file(Path::new("/nonexistent/checkin.yaml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("checkin.yaml");
        fs::write(&path, "username: jane.doe\nrequest_timeout_secs: 5\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.username.as_deref(), Some("jane.doe"));
        assert_eq!(settings.request_timeout_secs, 5);
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("checkin.yaml");
        fs::write(&path, "request_timeout_secs: [not, a, number]\n").unwrap();

        let result = Settings::from_file(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("CHECKIN_API_URL", "https://portal.example.edu/api"),
            ("CHECKIN_USERNAME", "john.doe"),
            ("CHECKIN_TOKEN", "abc"),
            ("CHECKIN_TIMEOUT_SECS", "12"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.api_base_url, "https://portal.example.edu/api");
        assert_eq!(settings.username.as_deref(), Some("john.doe"));
        assert_eq!(settings.token.as_deref(), Some("abc"));
        assert_eq!(settings.request_timeout_secs, 12);
    }

    #[test]
    fn test_invalid_timeout_override_is_ignored() {
        let mut settings = Settings::default();
        settings.apply_env(|k| (k == "CHECKIN_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(settings.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
