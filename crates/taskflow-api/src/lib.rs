pub mod handlers;
pub mod routes;
pub mod state;

// Re-exports
pub use routes::create_router;
pub use state::ApiState;

use taskflow_service::Settings;

/// Bind the API on `settings.api_port` and serve until shutdown
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let state = ApiState::from_settings(&settings).await?;
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", settings.api_port);
    tracing::info!("TaskFlow API Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
