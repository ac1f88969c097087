use std::time::Duration;

use anyhow::{Context, Result};
use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::Url;

use super::error::BackendError;
use crate::credentials::Credentials;

/// Client for the PostgREST-style tables served under `/rest/v1/`.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
}

impl BackendClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self, BackendError> {
        Ok(Self {
            http,
            base: parse_base_url(base_url)?,
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// URL for a table with PostgREST filters, e.g. `("show_id", "eq.oscars-2026")`
    pub fn table_url(&self, table: &str, filters: &[(&str, String)]) -> Result<Url, BackendError> {
        let mut url = self
            .base
            .join(&format!("rest/v1/{}", table))
            .map_err(|e| BackendError::InvalidUrl {
                url: self.base.to_string(),
                reason: e.to_string(),
            })?;

        if !filters.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in filters {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

/// Normalize the configured project URL so relative joins keep any path prefix.
pub fn parse_base_url(raw: &str) -> Result<Url, BackendError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{}/", trimmed)).map_err(|e| BackendError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(BackendError::InvalidUrl {
            url: raw.to_string(),
            reason: "expected an http(s) URL".to_string(),
        });
    }

    Ok(url)
}

/// `apikey` plus a bearer token: the user's access token when we have one,
/// otherwise the anon key (read-only under row-level security).
pub fn auth_headers(credentials: &Credentials) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut api_key =
        HeaderValue::from_str(&credentials.api_key).context("API key is not a valid header value")?;
    api_key.set_sensitive(true);
    headers.insert("apikey", api_key);

    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", credentials.bearer()))
        .context("Access token is not a valid header value")?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);

    Ok(headers)
}

/// Create a backend client authenticated with the given credentials
pub fn create_client(base_url: &str, credentials: &Credentials) -> Result<BackendClient> {
    let http = reqwest::Client::builder()
        .default_headers(auth_headers(credentials)?)
        .user_agent(concat!("will-win/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(15))
        .build()
        .context("Failed to create HTTP client")?;

    BackendClient::new(http, base_url).context("Failed to create backend client")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(reqwest::Client::new(), base).unwrap()
    }

    fn credentials(token: Option<&str>) -> Credentials {
        Credentials {
            api_key: "anon-key".to_string(),
            access_token: token.map(str::to_string),
            user_id: None,
        }
    }

    #[test]
    fn test_table_url_with_filters() {
        let url = client("https://xyz.supabase.co")
            .table_url(
                "picks",
                &[
                    ("show_id", "eq.oscars-2026".to_string()),
                    ("user_id", "eq.u1".to_string()),
                ],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://xyz.supabase.co/rest/v1/picks?show_id=eq.oscars-2026&user_id=eq.u1"
        );
    }

    #[test]
    fn test_table_url_without_filters_has_no_query() {
        let url = client("https://xyz.supabase.co/").table_url("profiles", &[]).unwrap();
        assert_eq!(url.as_str(), "https://xyz.supabase.co/rest/v1/profiles");
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let url = client("http://localhost:8080/proxy").table_url("winners", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/rest/v1/winners");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_auth_headers_fall_back_to_anon_key() {
        let headers = auth_headers(&credentials(None)).unwrap();
        assert_eq!(headers["apikey"], "anon-key");
        assert_eq!(headers[AUTHORIZATION], "Bearer anon-key");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn test_auth_headers_prefer_access_token() {
        let headers = auth_headers(&credentials(Some("jwt"))).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer jwt");
    }
}
