use std::io::IsTerminal;

use anyhow::{Context, Result};

use super::{CredentialError, Credentials, ENV_ACCESS_TOKEN_VAR};

/// Prompts the user to paste their access token
pub fn prompt_for_access_token() -> Result<String> {
    println!("An access token is required to save picks or manage leagues.");
    println!("Copy it from your signed-in session, or set {} to skip this prompt.", ENV_ACCESS_TOKEN_VAR);
    println!();

    let token = rpassword::prompt_password("Access token: ")
        .map_err(CredentialError::Prompt)
        .context("Failed to read access token from the terminal")?;

    let token = token.trim();
    if token.is_empty() {
        return Err(CredentialError::EmptyToken.into());
    }

    Ok(token.to_string())
}

/// Make sure write operations carry the user's token.
/// Prompts only when stdin is a terminal; returns whether a token was added.
pub fn ensure_access_token(credentials: &mut Credentials) -> Result<bool> {
    if credentials.access_token.is_some() {
        return Ok(false);
    }

    if !std::io::stdin().is_terminal() {
        anyhow::bail!(
            "No access token. Set {} to save changes non-interactively.",
            ENV_ACCESS_TOKEN_VAR
        );
    }

    credentials.access_token = Some(prompt_for_access_token()?);
    Ok(true)
}
