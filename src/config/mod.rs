pub mod init;
mod schema;

pub use schema::{BackendConfig, Config, DEFAULT_REFRESH_INTERVAL};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/will-win/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("will-win")
}

/// Get the default config file path (~/.config/will-win/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/will-win/config.yaml)
///
/// A missing default file is not an error when the backend URL comes from the
/// environment; an explicitly given path must exist.
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist (and nothing in the environment replaces it)
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if !explicit && std::env::var_os(crate::credentials::ENV_URL_VAR).is_some() {
            return Ok(Config::default());
        }
        anyhow::bail!(
            "Config file not found at {}. Run `will-win init` to create one",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Err(e) = config.refresh_interval() {
        errors.push(format!("{:#}", e));
    }

    if let Some(url) = &config.backend.url {
        if let Err(e) = crate::backend::client::parse_base_url(url) {
            errors.push(format!("backend.url: {}", e));
        }
    }

    if let Some(ballot) = &config.ballot {
        if let Err(ballot_errors) = crate::catalog::validate_catalog(ballot) {
            errors.extend(ballot_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Write a config file atomically, creating parent directories
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit().context("Failed to save config")?;

    Ok(())
}
