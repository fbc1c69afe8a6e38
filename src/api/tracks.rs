use std::sync::Arc;

use axum::{
    Extension,
    response::{IntoResponse, Json, Response},
};

use crate::{
    api::{Gateway, logged},
    error::Result,
    types::{NowPlaying, StatusMessage, TrackSummary},
};

pub async fn top_tracks(
    Extension(gateway): Extension<Arc<Gateway>>,
) -> Result<Json<Vec<TrackSummary>>> {
    logged("GET /spotify/top-tracks", fetch_top_tracks(&gateway).await).map(Json)
}

pub async fn now_playing(Extension(gateway): Extension<Arc<Gateway>>) -> Result<Response> {
    let playing = logged("GET /spotify/now-playing", fetch_now_playing(&gateway).await)?;

    Ok(match playing {
        Some(track) => Json(track).into_response(),
        None => Json(StatusMessage::new("No song currently playing")).into_response(),
    })
}

async fn fetch_top_tracks(gateway: &Gateway) -> Result<Vec<TrackSummary>> {
    let authorization = gateway.user_authorization().await?;
    gateway.spotify.top_tracks(&authorization).await
}

async fn fetch_now_playing(gateway: &Gateway) -> Result<Option<NowPlaying>> {
    let authorization = gateway.user_authorization().await?;
    gateway.spotify.now_playing(&authorization).await
}
