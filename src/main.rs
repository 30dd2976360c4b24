use tracing_subscriber::EnvFilter;

use org_repo_search::api;
use org_repo_search::config::Config;
use org_repo_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!(
        "Organizations: {:?} (GitHub API {})",
        config.github.organizations(),
        config.github.api_base_url
    );

    let issues = config.issues();
    if issues.missing_token {
        tracing::warn!("GITHUB_TOKEN is not set; searches will ask for configuration");
    }
    if issues.missing_organizations {
        tracing::warn!("GITHUB_ORGANIZATIONS is empty; searches will ask for configuration");
    }

    let state = AppState::open(config.clone()).await?;

    // Searches report "validating" until this finishes
    let validator = state.clone();
    tokio::spawn(async move {
        validator.validate_token().await;
    });

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
