use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use tokio::sync::Mutex;
use url::form_urlencoded;

use crate::{
    config::Config,
    error::{Error, Failure, Result},
    types::{AccessToken, Credentials, GrantContext, TokenResponse},
};

/// Seconds before expiry at which a cached token is considered stale.
pub const EXPIRY_LEEWAY_SECS: u64 = 240;

/// Exchanges credentials plus a grant for an access token.
///
/// Stateless: every call to [`TokenProvider::acquire`] issues one POST to the
/// token endpoint. Callers that want reuse wrap it in a [`TokenCache`].
#[derive(Debug, Clone)]
pub struct TokenProvider {
    http: Client,
    token_url: String,
    credentials: Credentials,
}

impl TokenProvider {
    pub fn new(http: Client, token_url: impl Into<String>, credentials: Credentials) -> Self {
        TokenProvider {
            http,
            token_url: token_url.into(),
            credentials,
        }
    }

    pub fn from_config(config: &Config, http: Client) -> Self {
        Self::new(http, config.token_url.clone(), config.credentials.clone())
    }

    /// Requests an access token for `grant`.
    ///
    /// The grant is taken by value; an authorization code cannot be replayed
    /// through the same value.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if a credential or the refresh token/code is empty.
    ///   No request is sent in that case.
    /// - [`Error::Auth`] with [`Failure::Status`] for any non-200 answer,
    ///   carrying the status and raw body text.
    /// - [`Error::Auth`] with [`Failure::Transport`] for network failures,
    ///   timeouts, or an undecodable 200 body.
    pub async fn acquire(&self, grant: GrantContext) -> Result<AccessToken> {
        validate(&self.credentials, &grant)?;

        let res = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, basic_auth_header(&self.credentials))
            .form(&form_body(&grant))
            .send()
            .await
            .map_err(|e| Error::Auth(e.into()))?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Auth(Failure::Status { status, body }));
        }

        let token: TokenResponse = res.json().await.map_err(|e| Error::Auth(e.into()))?;

        Ok(AccessToken {
            value: token.access_token,
            obtained_at: unix_now(),
            ttl_seconds: token.expires_in,
            refresh_token: token.refresh_token,
        })
    }
}

/// Form fields sent to the token endpoint for `grant`.
pub fn form_body(grant: &GrantContext) -> Vec<(&'static str, String)> {
    let mut body = vec![("grant_type", grant.grant_type().to_string())];
    match grant {
        GrantContext::RefreshToken { refresh_token } => {
            body.push(("refresh_token", refresh_token.clone()));
        }
        GrantContext::ClientCredentials => {}
        GrantContext::AuthorizationCode { code, redirect_uri } => {
            body.push(("code", code.clone()));
            body.push(("redirect_uri", redirect_uri.clone()));
        }
    }
    body
}

/// `Basic base64(client_id:client_secret)`.
pub fn basic_auth_header(credentials: &Credentials) -> String {
    let raw = format!("{}:{}", credentials.client_id, credentials.client_secret);
    format!("Basic {}", STANDARD.encode(raw))
}

/// `Bearer <token>`. Does not look at expiry.
pub fn authorization_header(token: &AccessToken) -> String {
    format!("Bearer {}", token.value)
}

/// User-facing consent URL for the authorization-code flow.
pub fn build_authorize_url(
    credentials: &Credentials,
    auth_url: &str,
    redirect_uri: &str,
    scopes: &[&str],
) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("client_id", &credentials.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", &scopes.join(" "))
        .finish();

    format!("{auth_url}?{query}")
}

/// Current Unix time in seconds; a clock before the epoch reads as 0.
pub fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

fn validate(credentials: &Credentials, grant: &GrantContext) -> Result<()> {
    if credentials.client_id.trim().is_empty() {
        return Err(Error::Config("client_id must not be empty".to_string()));
    }
    if credentials.client_secret.trim().is_empty() {
        return Err(Error::Config("client_secret must not be empty".to_string()));
    }

    match grant {
        GrantContext::RefreshToken { refresh_token } if refresh_token.trim().is_empty() => {
            Err(Error::Config("refresh_token must not be empty".to_string()))
        }
        GrantContext::AuthorizationCode { code, .. } if code.trim().is_empty() => {
            Err(Error::Config("authorization code must not be empty".to_string()))
        }
        _ => Ok(()),
    }
}

impl AccessToken {
    /// Unix timestamp at which the token stops being valid.
    pub fn expires_at(&self) -> u64 {
        self.obtained_at.saturating_add(self.ttl_seconds)
    }

    /// True once `now` is within [`EXPIRY_LEEWAY_SECS`] of expiry.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now.saturating_add(EXPIRY_LEEWAY_SECS) >= self.expires_at()
    }
}

/// Opt-in reuse of access tokens, one slot per grant type.
///
/// Authorization-code grants bypass the cache since each code is single-use.
#[derive(Debug, Default)]
pub struct TokenCache {
    slots: Mutex<HashMap<&'static str, AccessToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token for the grant type if still fresh, otherwise
    /// acquires a new one and stores it.
    pub async fn get_or_acquire(
        &self,
        provider: &TokenProvider,
        grant: GrantContext,
    ) -> Result<AccessToken> {
        if matches!(grant, GrantContext::AuthorizationCode { .. }) {
            return provider.acquire(grant).await;
        }

        let key = grant.grant_type();
        let mut slots = self.slots.lock().await;
        let now = unix_now();
        if let Some(token) = slots.get(key).filter(|t| !t.is_expired_at(now)) {
            return Ok(token.clone());
        }

        let token = provider.acquire(grant).await?;
        slots.insert(key, token.clone());
        Ok(token)
    }
}
