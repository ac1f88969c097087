use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::backend::cache::{get_cache_path, load_snapshot, store_snapshot, CacheConfig};
use crate::backend::{rest, BackendClient, BackendError, Snapshot};

/// Where a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Live,
    Cache,
}

/// Fetch picks, winners, profiles and show status concurrently.
///
/// Called from main.rs for one-shot commands and from the TUI event loop for
/// manual and timed refresh. A successful fetch is written to the cache.
pub async fn fetch_snapshot(
    client: &BackendClient,
    show_id: &str,
    cache_config: &CacheConfig,
) -> Result<Snapshot> {
    let (picks, winners, profiles, status) = futures::try_join!(
        rest::fetch_picks(client, show_id),
        rest::fetch_winners(client, show_id),
        rest::fetch_profiles(client),
        rest::fetch_show_status(client, show_id),
    )
    .context("Failed to fetch ballots")?;

    debug!(
        picks = picks.len(),
        winners = winners.len(),
        profiles = profiles.len(),
        "snapshot fetched"
    );

    let snapshot = Snapshot {
        show_id: show_id.to_string(),
        picks,
        winners,
        profiles,
        status,
        fetched_at: Some(Utc::now()),
    };

    if cache_config.enabled {
        // A cache write failure never fails the fetch
        if let Err(e) = store_snapshot(&get_cache_path(), &snapshot) {
            warn!(error = %e, "could not cache snapshot");
        }
    }

    Ok(snapshot)
}

/// Fetch live, falling back to the last cached snapshot when offline.
pub async fn load_snapshot_or_cached(
    client: &BackendClient,
    show_id: &str,
    cache_config: &CacheConfig,
) -> Result<(Snapshot, Source)> {
    match fetch_snapshot(client, show_id, cache_config).await {
        Ok(snapshot) => Ok((snapshot, Source::Live)),
        Err(e) if cache_config.enabled => match load_snapshot(&get_cache_path(), show_id) {
            Some(snapshot) => {
                warn!(error = %format!("{:#}", e), "fetch failed, using cached snapshot");
                info!(
                    fetched_at = ?snapshot.fetched_at,
                    "showing cached data for {}", show_id
                );
                Ok((snapshot, Source::Cache))
            }
            None => Err(e),
        },
        Err(e) => Err(e),
    }
}

/// The backend error at the root of an application error, if any
pub fn backend_error(err: &anyhow::Error) -> Option<&BackendError> {
    err.chain().find_map(|cause| cause.downcast_ref::<BackendError>())
}

/// Whether the backend rejected our key or token
pub fn is_auth_failure(err: &anyhow::Error) -> bool {
    backend_error(err).is_some_and(BackendError::is_auth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unauthorized() -> BackendError {
        BackendError::Unauthorized {
            url: "https://xyz.supabase.co/rest/v1/picks".to_string(),
            status: http::StatusCode::UNAUTHORIZED,
        }
    }

    #[test]
    fn test_auth_failure_found_through_context() {
        let err: anyhow::Error = Err::<(), _>(unauthorized())
            .context("Failed to fetch ballots")
            .unwrap_err();
        assert!(is_auth_failure(&err));
        assert!(backend_error(&err).is_some());
    }

    #[test]
    fn test_other_errors_are_not_auth() {
        let err = anyhow::anyhow!("config missing");
        assert!(!is_auth_failure(&err));
        assert!(backend_error(&err).is_none());
    }
}
