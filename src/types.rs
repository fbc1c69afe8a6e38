use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Client credentials registered with Spotify.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Credentials {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// The OAuth2 grant used for a single token request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantContext {
    RefreshToken { refresh_token: String },
    /// No user context; cannot reach `/me` endpoints.
    ClientCredentials,
    /// One-time; the code is consumed by the exchange.
    AuthorizationCode { code: String, redirect_uri: String },
}

impl GrantContext {
    pub fn grant_type(&self) -> &'static str {
        match self {
            GrantContext::RefreshToken { .. } => "refresh_token",
            GrantContext::ClientCredentials => "client_credentials",
            GrantContext::AuthorizationCode { .. } => "authorization_code",
        }
    }
}

/// Wire shape returned by the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub value: String,
    /// Unix timestamp in seconds.
    pub obtained_at: u64,
    pub ttl_seconds: u64,
    /// Only set by authorization-code exchanges.
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub uri: String,
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksResponse {
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlayingResponse {
    pub is_playing: bool,
    /// Null while an ad or an unavailable item is playing.
    pub item: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowedArtistsResponse {
    pub artists: ArtistsContainer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistsContainer {
    pub items: Vec<ArtistRef>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

/// Body of `PUT /me/player/play`. Absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uris: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub name: String,
    pub artists: Vec<String>,
    pub uri: String,
}

impl From<Track> for TrackSummary {
    fn from(track: Track) -> Self {
        TrackSummary {
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            uri: track.uri,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub name: String,
    pub artists: Vec<String>,
    pub is_playing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: String,
}

impl StatusMessage {
    pub fn new(status: impl Into<String>) -> Self {
        StatusMessage {
            status: status.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeTokenRequest {
    pub redirect_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeTokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub artists: String,
}
