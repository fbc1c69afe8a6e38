//! # API Module
//!
//! HTTP route handlers exposed by the SpotiPulse gateway.
//!
//! Each Spotify route follows the same shape: acquire a bearer token for the
//! configured refresh grant, issue exactly one upstream call, reshape the JSON
//! into the gateway's simplified contract, and turn failures into an HTTP
//! error carrying the upstream status and a `detail` message.
//!
//! ## Endpoints
//!
//! - [`root`] - `GET /` welcome message
//! - [`health`] - `GET /health` status and version
//! - [`top_tracks`] - `GET /spotify/top-tracks`
//! - [`now_playing`] - `GET /spotify/now-playing`
//! - [`followed_artists`] - `GET /spotify/followed-artists`
//! - [`stop_playback`] - `POST /spotify/stop`, `PUT /player/pause`
//! - [`start_playback`] - `POST /spotify/play`, `PUT /player/play`
//! - [`auth_url`] - `GET /spotify/auth-url`
//! - [`exchange_token`] - `POST /spotify/exchange-token`
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use axum::{Extension, Router, routing::get};
//! use spotipulse::api::{Gateway, top_tracks};
//!
//! let gateway = Arc::new(Gateway::new(config)?);
//! let app = Router::new()
//!     .route("/spotify/top-tracks", get(top_tracks))
//!     .layer(Extension(gateway));
//! ```

mod artists;
mod auth;
mod meta;
mod player;
mod state;
mod tracks;

pub use artists::followed_artists;
pub use auth::{auth_url, exchange_token};
pub use meta::{health, root};
pub use player::{start_playback, stop_playback};
pub use state::Gateway;
pub use tracks::{now_playing, top_tracks};

use crate::{error::Result, warning};

/// Logs a failed route before handing the error to axum.
fn logged<T>(route: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        warning!("{} failed ({}): {}", route, e.status(), e);
    }
    result
}
