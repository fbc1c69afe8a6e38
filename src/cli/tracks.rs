use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::Config,
    error,
    error::Result,
    spotify::{
        self, SpotifyClient,
        auth::{TokenProvider, authorization_header},
    },
    success,
    types::{GrantContext, TrackSummary},
    utils,
};

pub async fn top_tracks(config: &Config) {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching top tracks...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let result = fetch_top_tracks(config).await;
    pb.finish_and_clear();

    match result {
        Ok(tracks) => {
            success!("Your Top {} Tracks:", tracks.len());
            println!("{}", Table::new(utils::track_table_rows(&tracks)));
        }
        Err(e) => error!("Failed to fetch top tracks. Err: {}", e),
    }
}

async fn fetch_top_tracks(config: &Config) -> Result<Vec<TrackSummary>> {
    let http = spotify::http_client(config)?;
    let provider = TokenProvider::from_config(config, http.clone());
    let token = provider
        .acquire(GrantContext::RefreshToken {
            refresh_token: config.require_refresh_token()?.to_string(),
        })
        .await?;

    SpotifyClient::from_config(config, http)
        .top_tracks(&authorization_header(&token))
        .await
}
