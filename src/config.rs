//! Configuration management for the SpotiPulse gateway.
//!
//! Configuration is read from the process environment exactly once, at start,
//! into a [`Config`] value that is then passed by reference to the token
//! provider, the upstream client and the route handlers. Nothing below the
//! entry point reads the environment on its own.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`<data_local_dir>/spotipulse/.env`)
//! 4. Application defaults (where applicable)

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use crate::{
    error::{Error, Result},
    types::Credentials,
};

/// Redirect URI registered with the Spotify application.
pub const REDIRECT_URI: &str = "https://hyperoot.dev/callback";

/// Scopes requested during user consent.
pub const SCOPES: [&str; 6] = [
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "user-top-read",
    "user-follow-read",
    "streaming",
];

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Loads environment variables from `.env` files.
///
/// Reads `.env` from the working directory first and then from the
/// platform-specific local data directory under `spotipulse/.env`. Both files
/// are optional; values already present in the environment are never
/// overwritten.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotipulse/.env`
/// - macOS: `~/Library/Application Support/spotipulse/.env`
/// - Windows: `%LOCALAPPDATA%/spotipulse/.env`
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> std::result::Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotipulse/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    dotenv::dotenv().ok();
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Process-wide configuration, immutable after start.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    /// Long-lived refresh token used by the gateway routes.
    pub refresh_token: Option<String>,
    pub server_addr: SocketAddr,
    pub api_url: String,
    pub token_url: String,
    pub auth_url: String,
    pub redirect_uri: String,
    /// Applied to every outbound request.
    pub http_timeout: Duration,
    /// Reuse the gateway's access token until shortly before it expires.
    pub token_cache: bool,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `SPOTIFY_CLIENT_ID` or
    /// `SPOTIFY_CLIENT_SECRET` is missing or empty, or if any optional value
    /// is present but malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| get(key).ok_or_else(|| Error::Config(format!("{key} must be set")));

        let credentials = Credentials::new(
            required("SPOTIFY_CLIENT_ID")?,
            required("SPOTIFY_CLIENT_SECRET")?,
        );

        let server_addr = parse(
            "SERVER_ADDRESS",
            &get("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
        )?;

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse::<u64>("HTTP_TIMEOUT_SECS", &v)?),
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let token_cache = match get("SPOTIFY_TOKEN_CACHE") {
            Some(v) => parse_flag("SPOTIFY_TOKEN_CACHE", &v)?,
            None => false,
        };

        Ok(Config {
            credentials,
            refresh_token: get("SPOTIFY_REFRESH_TOKEN"),
            server_addr,
            api_url: trim_slash(get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into())),
            token_url: get("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.into()),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.into()),
            redirect_uri: REDIRECT_URI.to_string(),
            http_timeout,
            token_cache,
        })
    }

    /// The configured refresh token, or a config error if there is none.
    pub fn require_refresh_token(&self) -> Result<&str> {
        self.refresh_token
            .as_deref()
            .ok_or_else(|| Error::Config("SPOTIFY_REFRESH_TOKEN must be set".to_string()))
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| Error::Config(format!("{key} has invalid value {value:?}: {e}")))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!("{key} has invalid value {value:?}"))),
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
