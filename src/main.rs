mod config;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let config = config::Config::from_env().expect("invalid configuration");

    // The dispatch task owns every room; handlers only hold its handle.
    let (dispatch, _dispatch_task) = services::dispatch::spawn_dispatch(config.room_ttl, config.dispatch_buffer);
    let state = state::AppState::new(dispatch, config.client_buffer);

    let app = routes::app(state, config.client_url.as_deref());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(
        port = config.port,
        room_ttl_secs = config.room_ttl.as_secs(),
        cors = config.client_url.as_deref().unwrap_or("*"),
        "sketchroom listening"
    );
    axum::serve(listener, app).await.expect("server failed");
}
