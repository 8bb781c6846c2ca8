//! logbridge: Elasticsearch and Bugsnag behind one tool API.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use lb_config::{BugsnagConfig, EnvironmentConfig, IndexRegistry};
use lb_server::config::ServerConfig;
use lb_server::routes::build_router;
use lb_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logbridge starting");

    let server = ServerConfig::from_env()?;
    let environment = EnvironmentConfig::from_env()?;
    let bugsnag = BugsnagConfig::from_env()?;

    let indices = match &server.registry_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading index registry");
            IndexRegistry::from_path(path)?
        }
        None => IndexRegistry::builtin(),
    }
    .with_env_overrides();

    if !indices.has_environment(&environment.name) {
        tracing::warn!(environment = %environment.name, "environment not in index registry");
    }

    let state = AppState::connect(environment, bugsnag, indices)?;
    tracing::info!(
        environment = %state.environment.name,
        elasticsearch = %state.environment.elasticsearch.url,
        bugsnag = state.tracker.is_some(),
        tools = state.tools.len(),
        "backends configured"
    );

    let app = build_router(state);

    let addr = server.addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
