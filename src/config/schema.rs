use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::catalog::Catalog;

pub const DEFAULT_REFRESH_INTERVAL: &str = "5m";

fn default_auto_refresh_interval() -> String {
    DEFAULT_REFRESH_INTERVAL.to_string()
}

/// Main configuration file.
///
/// Example YAML:
/// ```yaml
/// backend:
///   url: https://abcd.supabase.co
///   anon_key: eyJhbGciOi...
/// user_id: 6f1c0c1e-5c1b-4d1e-9a43-0a1f0e3b2d11
/// auto_refresh_interval: 2m
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    /// Your user id (the `id` of your profile row)
    #[serde(default)]
    pub user_id: Option<String>,

    /// How often the TUI refetches, humantime format ("30s", "5m")
    #[serde(default = "default_auto_refresh_interval")]
    pub auto_refresh_interval: String,

    /// Ballot to play; defaults to the built-in 98th Academy Awards
    #[serde(default)]
    pub ballot: Option<Catalog>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            user_id: None,
            auto_refresh_interval: default_auto_refresh_interval(),
            ballot: None,
        }
    }
}

impl Config {
    /// The configured ballot, or the built-in one
    pub fn catalog(&self) -> Catalog {
        self.ballot.clone().unwrap_or_default()
    }

    pub fn refresh_interval(&self) -> Result<Duration> {
        let interval = humantime::parse_duration(&self.auto_refresh_interval).with_context(|| {
            format!(
                "auto_refresh_interval: invalid duration '{}'",
                self.auto_refresh_interval
            )
        })?;
        if interval < Duration::from_secs(10) {
            anyhow::bail!("auto_refresh_interval: must be at least 10s");
        }
        Ok(interval)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Project URL, e.g. https://abcd.supabase.co
    #[serde(default)]
    pub url: Option<String>,

    /// Public (anon) API key. Prefer WILLWIN_ANON_KEY over storing it here.
    #[serde(default)]
    pub anon_key: Option<String>,
}
