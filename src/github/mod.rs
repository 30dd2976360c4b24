//! GitHub REST calls: token scope check and repository search.

pub mod repos;
pub mod token;

pub use repos::{search_repositories, API_PAGE_SIZE};
pub use token::{check_token_scopes, DANGEROUS_SCOPES};

pub(crate) const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// HTTP client for GitHub. GitHub rejects requests without a User-Agent.
///
/// Built without a request timeout: a slow token check simply keeps the
/// session in the validating state.
pub fn http_client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
