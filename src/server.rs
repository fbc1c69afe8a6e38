use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post, put},
};
use tokio::net::TcpListener;

use crate::{Res, api, api::Gateway, config::Config, info};

/// Assembles the gateway's routes around a shared [`Gateway`].
pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/spotify/top-tracks", get(api::top_tracks))
        .route("/spotify/now-playing", get(api::now_playing))
        .route("/spotify/followed-artists", get(api::followed_artists))
        .route("/spotify/stop", post(api::stop_playback))
        .route("/player/pause", put(api::stop_playback))
        .route("/spotify/play", post(api::start_playback))
        .route("/player/play", put(api::start_playback))
        .route("/spotify/auth-url", get(api::auth_url))
        .route("/spotify/exchange-token", post(api::exchange_token))
        .layer(Extension(gateway))
}

/// Serves the gateway on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, gateway: Arc<Gateway>) -> std::io::Result<()> {
    axum::serve(listener, router(gateway)).await
}

/// Binds `config.server_addr` and serves the gateway.
pub async fn start_api_server(config: Config) -> Res<()> {
    let addr = config.server_addr;
    let gateway = Arc::new(Gateway::new(config)?);

    let listener = TcpListener::bind(addr).await?;
    info!("SpotiPulse listening on http://{}", listener.local_addr()?);
    if gateway.config.token_cache {
        info!("Token cache enabled");
    }

    serve(listener, gateway).await?;
    Ok(())
}
