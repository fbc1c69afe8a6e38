use std::sync::Arc;

use axum::{Extension, response::Json};

use crate::{
    api::{Gateway, logged},
    error::Result,
};

pub async fn followed_artists(
    Extension(gateway): Extension<Arc<Gateway>>,
) -> Result<Json<Vec<String>>> {
    logged(
        "GET /spotify/followed-artists",
        fetch_followed_artists(&gateway).await,
    )
    .map(Json)
}

async fn fetch_followed_artists(gateway: &Gateway) -> Result<Vec<String>> {
    let authorization = gateway.user_authorization().await?;
    gateway.spotify.followed_artists(&authorization).await
}
