use std::sync::Arc;

use axum::{
    Extension,
    extract::{Query, RawQuery},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use crate::{
    api::{Gateway, logged},
    error::{Error, Failure, Result},
    types::StatusMessage,
    utils::{PlayParams, parse_play_query},
};

#[derive(Debug, Deserialize)]
pub struct DeviceQuery {
    /// Target device; the user's active device when absent.
    pub device_id: Option<String>,
}

/// Pauses playback. Served on `POST /spotify/stop` and `PUT /player/pause`.
pub async fn stop_playback(
    Extension(gateway): Extension<Arc<Gateway>>,
    Query(query): Query<DeviceQuery>,
) -> Result<Json<StatusMessage>> {
    let result = pause(&gateway, query.device_id.as_deref())
        .await
        .map_err(|e| no_device(e, "No active device found to stop playback."));

    logged("stop playback", result).map(|_| Json(StatusMessage::new("Playback stopped")))
}

/// Starts playback. Served on `POST /spotify/play` and `PUT /player/play`.
///
/// Accepts `device_id`, `context_uri`, repeated `uris` and `position_ms`
/// query parameters.
pub async fn start_playback(
    Extension(gateway): Extension<Arc<Gateway>>,
    RawQuery(query): RawQuery,
) -> Result<Json<StatusMessage>> {
    let result = match parse_play_query(query.as_deref()) {
        Ok(params) => play(&gateway, &params)
            .await
            .map_err(|e| no_device(e, "No active device found to start playback.")),
        Err(e) => Err(e),
    };

    logged("start playback", result).map(|_| Json(StatusMessage::new("Playback started")))
}

async fn pause(gateway: &Gateway, device_id: Option<&str>) -> Result<()> {
    let authorization = gateway.user_authorization().await?;
    gateway.spotify.pause(&authorization, device_id).await
}

async fn play(gateway: &Gateway, params: &PlayParams) -> Result<()> {
    let authorization = gateway.user_authorization().await?;
    gateway
        .spotify
        .play(&authorization, params.device_id.as_deref(), &params.request)
        .await
}

fn no_device(err: Error, message: &str) -> Error {
    match err {
        Error::Upstream(Failure::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
            Error::NotFound(message.to_string())
        }
        other => other,
    }
}
