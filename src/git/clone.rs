use anyhow::{Context, Result};
use git2::build::RepoBuilder;
use git2::{Cred, CredentialType, FetchOptions, RemoteCallbacks};
use std::path::{Path, PathBuf};

/// Where a repository named `repo_name` is cloned under `base_dir`.
pub fn clone_destination(base_dir: &Path, repo_name: &str) -> PathBuf {
    base_dir.join(repo_name)
}

/// A token and the only host it may be sent to.
#[derive(Debug, Clone)]
pub struct CloneAuth {
    pub token: String,
    pub host: String,
}

/// Whether the token may be offered for a credential request on `url`.
///
/// Only plaintext user/password requests from the trusted host qualify.
pub fn offers_token(url: &str, trusted_host: &str, allowed: CredentialType) -> bool {
    if !allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
        return false;
    }
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.eq_ignore_ascii_case(trusted_host)))
        .unwrap_or(false)
}

/// Clone a git repository to the target directory.
///
/// When auth is given the token is offered as HTTPS credentials to its host
/// so private repositories can be cloned.
pub fn clone_repo(url: &str, target: &Path, auth: Option<CloneAuth>) -> Result<()> {
    if target.exists() && target.read_dir().map(|mut d| d.next().is_some()).unwrap_or(true) {
        anyhow::bail!("Destination {} already exists and is not empty", target.display());
    }
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    tracing::info!("Cloning {} into {}", url, target.display());

    let mut builder = RepoBuilder::new();
    if let Some(auth) = auth {
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(move |url, _username, allowed| {
            if offers_token(url, &auth.host, allowed) {
                Cred::userpass_plaintext("x-access-token", &auth.token)
            } else {
                Err(git2::Error::from_str(&format!("Refusing to send GitHub token to {url}")))
            }
        });
        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);
        builder.fetch_options(fetch_options);
    }

    builder
        .clone(url, target)
        .with_context(|| format!("Failed to clone {url}"))?;
    tracing::info!("Clone complete: {}", target.display());
    Ok(())
}
