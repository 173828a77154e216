use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable consulted for the API key when `--apiKey` is absent.
pub const API_KEY_ENV: &str = "OPSGENIE_API_KEY";

/// Settings read from the lamp configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default, alias = "apiKey")]
    pub api_key: Option<String>,
    #[serde(default, alias = "apiUrl")]
    pub api_url: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default, alias = "requestTimeoutSecs")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default, alias = "maxRetries")]
    pub max_retries: Option<usize>,
}

impl Config {
    /// Load configuration from the provided path or the default config file.
    ///
    /// A missing default file yields an empty configuration; a missing file
    /// that was asked for explicitly is an error.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.as_ref().to_path_buf(), true),
            None => (Config::default_path(), false),
        };

        if !path.exists() {
            if explicit {
                bail!("Config file not found at {}", path.display());
            }
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Unable to read config file at {}", path.display()))?;

        if raw.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&raw)
            .with_context(|| format!("Malformed YAML in config file {}", path.display()))
    }

    /// Picks the API key: the explicit value, then `OPSGENIE_API_KEY`, then
    /// the file. Blank values are skipped.
    pub fn resolve_api_key(&self, explicit: Option<&str>) -> Option<String> {
        let env = std::env::var(API_KEY_ENV).ok();
        pick_first([explicit, env.as_deref(), self.api_key.as_deref()])
    }

    /// Picks the executing user: the explicit value, then the file.
    pub fn resolve_user(&self, explicit: Option<&str>) -> Option<String> {
        pick_first([explicit, self.user.as_deref()])
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".opsgenie-lamp");
        path.push("config.yaml");
        path
    }
}

fn pick_first<const N: usize>(candidates: [Option<&str>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
