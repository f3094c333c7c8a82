// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.planify", "Planify", "planify"));

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2).context("Could not determine platform-specific dirs")
}

pub fn config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

/// Runtime settings. Read from `config.json` in the platform config dir,
/// then overridden by `PLANIFY_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the hosted identity provider, e.g. `https://xyz.supabase.co`.
    pub auth_url: Option<String>,
    /// Public (anon) API key sent with every auth request.
    pub auth_key: Option<String>,
    /// Overrides the record store location.
    pub db_path: Option<PathBuf>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        let file = if path.exists() {
            Some(
                fs::read_to_string(&path)
                    .with_context(|| format!("Read config at {}", path.display()))?,
            )
        } else {
            None
        };
        Self::from_sources(file.as_deref(), |k| std::env::var(k).ok())
    }

    pub fn from_sources<F>(file: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings: Settings = match file {
            Some(raw) => serde_json::from_str(raw).context("Invalid config.json")?,
            None => Settings::default(),
        };
        if let Some(v) = env("PLANIFY_AUTH_URL").filter(|s| !s.trim().is_empty()) {
            settings.auth_url = Some(v.trim().trim_end_matches('/').to_string());
        }
        if let Some(v) = env("PLANIFY_AUTH_KEY").filter(|s| !s.trim().is_empty()) {
            settings.auth_key = Some(v.trim().to_string());
        }
        if let Some(v) = env("PLANIFY_DB").filter(|s| !s.trim().is_empty()) {
            settings.db_path = Some(PathBuf::from(v.trim()));
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_file() {
        let file = r#"{"auth_url":"https://file.example","auth_key":"file-key"}"#;
        let s = Settings::from_sources(Some(file), |k| match k {
            "PLANIFY_AUTH_URL" => Some("https://env.example/".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(s.auth_url.as_deref(), Some("https://env.example"));
        assert_eq!(s.auth_key.as_deref(), Some("file-key"));
        assert!(s.db_path.is_none());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let s = Settings::from_sources(None, |_| None).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Settings::from_sources(Some("{not json"), |_| None).is_err());
    }
}
