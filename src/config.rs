use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Clone base directory used when none is configured.
pub const DEFAULT_CLONE_DIR: &str = "~/Developer";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the key-value storage files live
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// GitHub credentials and organization scoping
    pub github: GithubConfig,
    /// Base directory for clones (`~` is expanded)
    pub clone_directory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Personal access token sent with every GitHub request
    pub token: Option<String>,
    /// Comma-separated organization names, as entered by the user
    pub organizations: String,
    /// Base URL for the GitHub REST API
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:9000".to_string(),
            github: GithubConfig::default(),
            clone_directory: None,
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            organizations: String::new(),
            api_base_url: "https://api.github.com".to_string(),
        }
    }
}

impl GithubConfig {
    /// Organization names in the order they were configured.
    pub fn organizations(&self) -> Vec<String> {
        parse_organizations(&self.organizations)
    }

    /// Host serving clone URLs for the configured API: `api.github.com` maps
    /// to `github.com`, an Enterprise `https://ghe.example/api/v3` to
    /// `ghe.example`.
    pub fn web_host(&self) -> Option<String> {
        let url = reqwest::Url::parse(&self.api_base_url).ok()?;
        let host = url.host_str()?;
        Some(host.strip_prefix("api.").unwrap_or(host).to_ascii_lowercase())
    }

    /// The configured token, ignoring blank values.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("REPO_SEARCH_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("REPO_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            config.github.token = Some(token);
        }
        if let Ok(orgs) = std::env::var("GITHUB_ORGANIZATIONS") {
            config.github.organizations = orgs;
        }
        if let Ok(url) = std::env::var("GITHUB_API_URL") {
            config.github.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(dir) = std::env::var("REPO_SEARCH_CLONE_DIR") {
            if !dir.trim().is_empty() {
                config.clone_directory = Some(dir);
            }
        }

        config
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join("storage")
    }

    /// Resolve the clone base directory, expanding a leading `~`.
    pub fn clone_base_dir(&self) -> Result<PathBuf> {
        let raw = self
            .clone_directory
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_CLONE_DIR);
        let expanded = shellexpand::tilde(raw);
        let path = PathBuf::from(expanded.as_ref());
        if path.starts_with("~") {
            // tilde() leaves the path untouched when no home directory is known
            anyhow::bail!("Failed to resolve clone directory {raw}: home directory unknown");
        }
        Ok(path)
    }

    /// Problems that block searching until the user fixes their settings.
    pub fn issues(&self) -> ConfigIssues {
        ConfigIssues {
            missing_token: self.github.token().is_none(),
            missing_organizations: self.github.organizations().is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfigIssues {
    pub missing_token: bool,
    pub missing_organizations: bool,
}

impl ConfigIssues {
    pub fn is_blocking(&self) -> bool {
        self.missing_token || self.missing_organizations
    }
}

/// Split a comma-separated organization list, trimming and dropping empties.
pub fn parse_organizations(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|org| !org.is_empty())
        .map(str::to_string)
        .collect()
}
