use crate::{
    config::Config,
    error::Result,
    spotify::{
        self, SpotifyClient,
        auth::{TokenCache, TokenProvider, authorization_header},
    },
    types::GrantContext,
};

/// Everything the route handlers share: configuration, the token provider,
/// the upstream client and, if enabled, the token cache.
#[derive(Debug)]
pub struct Gateway {
    pub config: Config,
    pub tokens: TokenProvider,
    pub spotify: SpotifyClient,
    cache: Option<TokenCache>,
}

impl Gateway {
    pub fn new(config: Config) -> Result<Self> {
        let http = spotify::http_client(&config)?;
        let tokens = TokenProvider::from_config(&config, http.clone());
        let spotify = SpotifyClient::from_config(&config, http);
        let cache = config.token_cache.then(TokenCache::new);

        Ok(Gateway {
            config,
            tokens,
            spotify,
            cache,
        })
    }

    /// `Authorization` header value for the configured user.
    ///
    /// Acquires a fresh token on every call unless the token cache is enabled.
    pub async fn user_authorization(&self) -> Result<String> {
        let grant = GrantContext::RefreshToken {
            refresh_token: self.config.require_refresh_token()?.to_string(),
        };

        let token = match &self.cache {
            Some(cache) => cache.get_or_acquire(&self.tokens, grant).await?,
            None => self.tokens.acquire(grant).await?,
        };

        Ok(authorization_header(&token))
    }
}
