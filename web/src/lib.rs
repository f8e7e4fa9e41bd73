//! Browser front-end for the task API.
//!
//! Serves the board as server-rendered HTML and turns form posts into
//! `TaskManager` commands. The API base URL and the list layout come from
//! [`config::Config`].

pub mod config;
pub mod page;
pub mod routes;
pub mod transport;

pub use config::Config;
pub use routes::{app, AppState};
pub use transport::UreqTransport;

/// Bind the configured address and serve until the process exits.
#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let client = task_core::TaskClient::new(&config.api_url);
    let state = AppState::new(client, UreqTransport::new(), config.layout);

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(api_url = %config.api_url, layout = ?config.layout, "task board running on http://{address}");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
