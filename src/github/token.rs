use anyhow::{Context, Result};

use crate::config::GithubConfig;
use crate::models::TokenScopeResult;

/// Scopes that grant more than this tool ever needs. A token carrying any of
/// them is refused.
pub const DANGEROUS_SCOPES: [&str; 4] = ["delete_repo", "workflow", "admin:org", "write:repo_hook"];

const SCOPES_HEADER: &str = "x-oauth-scopes";

/// Check the configured token against GitHub's identity endpoint.
///
/// Never fails: a missing token, a transport error, a non-success status or a
/// dangerous scope all produce an invalid result.
pub async fn check_token_scopes(
    client: &reqwest::Client,
    config: &GithubConfig,
) -> TokenScopeResult {
    let Some(token) = config.token() else {
        return TokenScopeResult::rejected();
    };

    match fetch_scopes(client, config, token).await {
        Ok(scopes) => {
            let valid = !has_dangerous_scope(&scopes);
            if !valid {
                tracing::warn!("GitHub token rejected, it grants dangerous scopes: {scopes:?}");
            }
            TokenScopeResult { valid, scopes }
        }
        Err(e) => {
            tracing::warn!("GitHub token check failed: {e:#}");
            TokenScopeResult::rejected()
        }
    }
}

async fn fetch_scopes(
    client: &reqwest::Client,
    config: &GithubConfig,
    token: &str,
) -> Result<Vec<String>> {
    let url = format!("{}/user", config.api_base_url);

    let resp = client
        .get(&url)
        .header("Authorization", format!("Bearer {token}"))
        .header("Accept", super::ACCEPT_HEADER)
        .send()
        .await
        .context("Failed to call GitHub user API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        anyhow::bail!("GitHub user API returned {status}");
    }

    Ok(resp
        .headers()
        .get(SCOPES_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(parse_scopes)
        .unwrap_or_default())
}

/// Split the comma-separated scopes header.
pub fn parse_scopes(header: &str) -> Vec<String> {
    header
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn has_dangerous_scope(scopes: &[String]) -> bool {
    scopes.iter().any(|s| DANGEROUS_SCOPES.contains(&s.as_str()))
}
