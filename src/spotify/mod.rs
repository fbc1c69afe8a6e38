//! # Spotify Integration Module
//!
//! Outbound side of the gateway: the token provider that turns credentials
//! and a grant into a bearer token, and one function per proxied Spotify
//! endpoint.
//!
//! ```text
//! Gateway routes (api)
//!          ↓
//! Spotify Integration Layer
//!     ├── Token Provider (auth)
//!     ├── Top Tracks (tracks)
//!     ├── Followed Artists (artists)
//!     └── Playback Control (player)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API / Accounts service
//! ```
//!
//! Every operation issues exactly one request and accepts an explicit set of
//! status codes. Anything outside that set is returned as
//! [`Failure::Status`] with the upstream code and body. There are no retries.
//!
//! A single [`reqwest::Client`] with the configured timeout is shared by the
//! token provider and the endpoint calls.

use reqwest::{Client, Response, StatusCode};

use crate::{
    config::Config,
    error::{Error, Failure, Result},
};

pub mod artists;
pub mod auth;
pub mod player;
pub mod tracks;

/// Accepted statuses for read endpoints.
pub const READ_OK: &[StatusCode] = &[StatusCode::OK];

/// Accepted statuses for playback mutations.
pub const PLAYBACK_OK: &[StatusCode] = &[StatusCode::OK, StatusCode::ACCEPTED, StatusCode::NO_CONTENT];

/// Builds the shared HTTP client with the configured request timeout.
pub fn http_client(config: &Config) -> Result<Client> {
    Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))
}

/// Client for the Spotify Web API (`/v1`).
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: impl Into<String>) -> Self {
        SpotifyClient {
            http,
            api_url: api_url.into(),
        }
    }

    pub fn from_config(config: &Config, http: Client) -> Self {
        Self::new(http, config.api_url.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

/// Passes the response through if its status is accepted, otherwise drains
/// the body into a [`Failure::Status`].
pub(crate) async fn expect_status(
    res: Response,
    accepted: &[StatusCode],
) -> std::result::Result<Response, Failure> {
    let status = res.status();
    if accepted.contains(&status) {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    Err(Failure::Status { status, body })
}
