pub mod prompt;

pub use prompt::{ensure_access_token, prompt_for_access_token};

use crate::config::Config;

/// Project URL override (otherwise `backend.url` from the config file)
pub const ENV_URL_VAR: &str = "WILLWIN_URL";
/// Public API key of the backend project
pub const ENV_ANON_KEY_VAR: &str = "WILLWIN_ANON_KEY";
/// The signed-in user's access token, required for writes
pub const ENV_ACCESS_TOKEN_VAR: &str = "WILLWIN_ACCESS_TOKEN";
pub const ENV_USER_ID_VAR: &str = "WILLWIN_USER_ID";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("no API key: set WILLWIN_ANON_KEY or backend.anon_key in the config file")]
    MissingApiKey,
    #[error("no user id: set WILLWIN_USER_ID or user_id in the config file")]
    MissingUserId,
    #[error("access token cannot be empty")]
    EmptyToken,
    #[error("failed to read access token: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Everything needed to talk to the backend as a given user
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub access_token: Option<String>,
    pub user_id: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl Credentials {
    /// Token sent as `Authorization: Bearer`
    pub fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }

    pub fn user_id(&self) -> Result<&str, CredentialError> {
        self.user_id.as_deref().ok_or(CredentialError::MissingUserId)
    }
}

/// Trimmed value, or None when unset or blank
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_var(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

/// Environment first, then the config file
fn resolve_with(
    config: &Config,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, CredentialError> {
    let api_key = env(ENV_ANON_KEY_VAR)
        .or_else(|| non_empty(config.backend.anon_key.clone()))
        .ok_or(CredentialError::MissingApiKey)?;

    Ok(Credentials {
        api_key,
        access_token: env(ENV_ACCESS_TOKEN_VAR),
        user_id: env(ENV_USER_ID_VAR).or_else(|| non_empty(config.user_id.clone())),
    })
}

pub fn resolve_credentials(config: &Config) -> Result<Credentials, CredentialError> {
    resolve_with(config, env_var)
}

/// Backend URL from the environment or the config file
pub fn resolve_url(config: &Config) -> Option<String> {
    env_var(ENV_URL_VAR).or_else(|| non_empty(config.backend.url.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| non_empty(map.get(name).cloned())
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  abc ".to_string())), Some("abc".to_string()));
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_env_wins_over_config() {
        let mut config = Config::default();
        config.backend.anon_key = Some("from-config".to_string());
        config.user_id = Some("config-user".to_string());

        let creds = resolve_with(
            &config,
            env(&[(ENV_ANON_KEY_VAR, "from-env"), (ENV_USER_ID_VAR, "env-user")]),
        )
        .unwrap();
        assert_eq!(creds.api_key, "from-env");
        assert_eq!(creds.user_id().unwrap(), "env-user");
    }

    #[test]
    fn test_config_fallback() {
        let mut config = Config::default();
        config.backend.anon_key = Some("from-config".to_string());
        config.user_id = Some("config-user".to_string());

        let creds = resolve_with(&config, env(&[])).unwrap();
        assert_eq!(creds.api_key, "from-config");
        assert_eq!(creds.user_id.as_deref(), Some("config-user"));
        assert_eq!(creds.bearer(), "from-config");
    }

    #[test]
    fn test_missing_api_key() {
        let err = resolve_with(&Config::default(), env(&[])).unwrap_err();
        assert!(matches!(err, CredentialError::MissingApiKey));
    }

    #[test]
    fn test_access_token_is_bearer() {
        let creds = resolve_with(
            &Config::default(),
            env(&[(ENV_ANON_KEY_VAR, "anon"), (ENV_ACCESS_TOKEN_VAR, "jwt")]),
        )
        .unwrap();
        assert_eq!(creds.bearer(), "jwt");
        assert!(matches!(creds.user_id(), Err(CredentialError::MissingUserId)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials {
            api_key: "secret-key".to_string(),
            access_token: Some("secret-token".to_string()),
            user_id: Some("u1".to_string()),
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("u1"));
    }
}
