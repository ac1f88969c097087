use http::header::HeaderValue;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, instrument, warn};

use super::client::BackendClient;
use super::error::BackendError;
use super::types::{League, LeagueMember, NewLeague, Pick, Profile, ShowStatus, Winner};

pub type Result<T> = std::result::Result<T, BackendError>;

const PICKS_CONFLICT_KEY: &str = "user_id,show_id,category_id";

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

/// PostgREST `in.(...)` filter; values are quoted so commas inside ids survive
fn one_of(values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

/// Decode a JSON array of rows
pub fn decode_rows<T: DeserializeOwned>(url: &Url, body: &[u8]) -> Result<Vec<T>> {
    serde_json::from_slice(body).map_err(|source| BackendError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Send a request and return the body of a successful response
async fn send(request: RequestBuilder, url: &Url) -> Result<Vec<u8>> {
    let response = request.send().await.map_err(|source| BackendError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if status == http::StatusCode::UNAUTHORIZED || status == http::StatusCode::FORBIDDEN {
        return Err(BackendError::Unauthorized {
            url: url.to_string(),
            status,
        });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::UnexpectedStatus {
            url: url.to_string(),
            status,
            body,
        });
    }

    let bytes = response.bytes().await.map_err(|source| BackendError::Http {
        url: url.to_string(),
        source,
    })?;
    Ok(bytes.to_vec())
}

/// GET rows from a table, retrying transient failures
async fn get_rows<T: DeserializeOwned>(
    client: &BackendClient,
    table: &str,
    filters: &[(&str, String)],
) -> Result<Vec<T>> {
    let url = client.table_url(table, filters)?;

    // Retry strategy: exponential backoff with 3 attempts
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(std::time::Duration::from_secs(5))
        .take(3);

    let http_client = client.http();
    let target = &url;
    let body = RetryIf::spawn(
        retry_strategy,
        || async move { send(http_client.get(target.clone()), target).await },
        |e: &BackendError| {
            let transient = e.is_transient();
            if transient {
                warn!(%url, error = %e, "retrying request");
            }
            transient
        },
    )
    .await?;

    let rows = decode_rows(&url, &body)?;
    debug!(%url, rows = rows.len(), "fetched rows");
    Ok(rows)
}

/// POST a JSON payload to a table
async fn post_rows<B: Serialize + ?Sized>(
    client: &BackendClient,
    table: &str,
    filters: &[(&str, String)],
    prefer: &'static str,
    payload: &B,
) -> Result<Vec<u8>> {
    let url = client.table_url(table, filters)?;
    let request = client
        .http()
        .post(url.clone())
        .header("Prefer", HeaderValue::from_static(prefer))
        .json(payload);
    send(request, &url).await
}

/// Every pick for a show
#[instrument(skip(client))]
pub async fn fetch_picks(client: &BackendClient, show_id: &str) -> Result<Vec<Pick>> {
    get_rows(client, "picks", &[("show_id", eq(show_id))]).await
}

/// One user's picks for a show
#[instrument(skip(client))]
pub async fn fetch_user_picks(
    client: &BackendClient,
    show_id: &str,
    user_id: &str,
) -> Result<Vec<Pick>> {
    get_rows(
        client,
        "picks",
        &[("show_id", eq(show_id)), ("user_id", eq(user_id))],
    )
    .await
}

#[instrument(skip(client))]
pub async fn fetch_winners(client: &BackendClient, show_id: &str) -> Result<Vec<Winner>> {
    get_rows(client, "winners", &[("show_id", eq(show_id))]).await
}

#[instrument(skip(client))]
pub async fn fetch_profiles(client: &BackendClient) -> Result<Vec<Profile>> {
    get_rows(client, "profiles", &[]).await
}

/// Publication flags for a show; defaults to open when the show has no row
#[instrument(skip(client))]
pub async fn fetch_show_status(client: &BackendClient, show_id: &str) -> Result<ShowStatus> {
    let rows: Vec<ShowStatus> = get_rows(client, "shows", &[("id", eq(show_id))]).await?;
    Ok(rows.into_iter().next().unwrap_or_default())
}

/// Insert or replace the caller's pick for a category (last write wins)
#[instrument(skip(client, pick), fields(category = %pick.category_id))]
pub async fn upsert_pick(client: &BackendClient, pick: &Pick) -> Result<()> {
    post_rows(
        client,
        "picks",
        &[("on_conflict", PICKS_CONFLICT_KEY.to_string())],
        "resolution=merge-duplicates,return=minimal",
        &[pick],
    )
    .await?;
    debug!("pick saved");
    Ok(())
}

/// Leagues the user belongs to for a show
#[instrument(skip(client))]
pub async fn fetch_leagues_for_user(
    client: &BackendClient,
    show_id: &str,
    user_id: &str,
) -> Result<Vec<League>> {
    let memberships: Vec<LeagueMember> =
        get_rows(client, "league_members", &[("user_id", eq(user_id))]).await?;
    if memberships.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = memberships.into_iter().map(|m| m.league_id).collect();
    get_rows(
        client,
        "leagues",
        &[("id", one_of(&ids)), ("show_id", eq(show_id))],
    )
    .await
}

#[instrument(skip(client))]
pub async fn fetch_league(client: &BackendClient, league_id: &str) -> Result<Option<League>> {
    let rows: Vec<League> = get_rows(client, "leagues", &[("id", eq(league_id))]).await?;
    Ok(rows.into_iter().next())
}

#[instrument(skip(client))]
pub async fn fetch_league_members(
    client: &BackendClient,
    league_id: &str,
) -> Result<Vec<LeagueMember>> {
    get_rows(client, "league_members", &[("league_id", eq(league_id))]).await
}

#[instrument(skip(client))]
pub async fn find_league_by_invite(
    client: &BackendClient,
    invite_code: &str,
) -> Result<Option<League>> {
    let rows: Vec<League> =
        get_rows(client, "leagues", &[("invite_code", eq(invite_code))]).await?;
    Ok(rows.into_iter().next())
}

/// Create a league; the owner is added as its first member
#[instrument(skip(client, league), fields(name = %league.name))]
pub async fn create_league(client: &BackendClient, league: &NewLeague) -> Result<League> {
    let body = post_rows(client, "leagues", &[], "return=representation", &[league]).await?;
    let url = client.table_url("leagues", &[])?;
    let created: League = decode_rows(&url, &body)?
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::UnexpectedStatus {
            url: url.to_string(),
            status: http::StatusCode::OK,
            body: "league insert returned no rows".to_string(),
        })?;

    join_league(client, &created.id, &league.owner_id).await?;
    Ok(created)
}

#[instrument(skip(client))]
pub async fn join_league(client: &BackendClient, league_id: &str, user_id: &str) -> Result<()> {
    let member = LeagueMember {
        league_id: league_id.to_string(),
        user_id: user_id.to_string(),
    };
    post_rows(
        client,
        "league_members",
        &[("on_conflict", "league_id,user_id".to_string())],
        "resolution=ignore-duplicates,return=minimal",
        &[member],
    )
    .await?;
    Ok(())
}
