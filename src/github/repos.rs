use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::GithubConfig;
use crate::models::RepositoryRecord;

/// Results requested per search call.
pub const API_PAGE_SIZE: usize = 30;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RepositoryRecord>,
}

/// Run a repository search, most-starred first.
pub async fn search_repositories(
    client: &reqwest::Client,
    config: &GithubConfig,
    query: &str,
) -> Result<Vec<RepositoryRecord>> {
    let url = format!("{}/search/repositories", config.api_base_url);
    let per_page = API_PAGE_SIZE.to_string();

    let mut req = client
        .get(&url)
        .query(&[
            ("q", query),
            ("sort", "stars"),
            ("order", "desc"),
            ("per_page", per_page.as_str()),
        ])
        .header("Accept", super::ACCEPT_HEADER);
    if let Some(token) = config.token() {
        req = req.header("Authorization", format!("Bearer {token}"));
    }

    let resp = req
        .send()
        .await
        .context("Failed to call GitHub search API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("GitHub search API returned {status}: {body}");
    }

    let body: SearchResponse = resp
        .json()
        .await
        .context("Failed to parse GitHub search response")?;

    tracing::debug!("GitHub search \"{query}\" returned {} items", body.items.len());
    Ok(body.items)
}
