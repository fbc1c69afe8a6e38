use std::sync::Arc;

use axum::{Extension, body::Bytes, response::Json};

use crate::{
    api::{Gateway, logged},
    config::SCOPES,
    error::{Error, Result},
    spotify::auth::build_authorize_url,
    types::{AuthUrlResponse, ExchangeTokenResponse, GrantContext},
    utils,
};

/// Consent URL the user opens to authorize the gateway.
pub async fn auth_url(Extension(gateway): Extension<Arc<Gateway>>) -> Json<AuthUrlResponse> {
    let config = &gateway.config;
    Json(AuthUrlResponse {
        auth_url: build_authorize_url(
            &config.credentials,
            &config.auth_url,
            &config.redirect_uri,
            &SCOPES,
        ),
    })
}

/// Exchanges the code in a redirected callback URL for a token pair.
///
/// The body is the redirected URL, as plain text or as JSON
/// `{"redirect_url": "..."}`. The returned refresh token is what goes into
/// `SPOTIFY_REFRESH_TOKEN`.
pub async fn exchange_token(
    Extension(gateway): Extension<Arc<Gateway>>,
    body: Bytes,
) -> Result<Json<ExchangeTokenResponse>> {
    logged("POST /spotify/exchange-token", exchange(&gateway, &body).await).map(Json)
}

async fn exchange(gateway: &Gateway, body: &[u8]) -> Result<ExchangeTokenResponse> {
    let redirect_url = utils::parse_redirect_body(body)?;
    let code = utils::extract_code(&redirect_url).ok_or_else(|| {
        Error::BadRequest("Authorization code not found in the URL.".to_string())
    })?;

    let token = gateway
        .tokens
        .acquire(GrantContext::AuthorizationCode {
            code,
            redirect_uri: gateway.config.redirect_uri.clone(),
        })
        .await?;

    Ok(ExchangeTokenResponse {
        access_token: token.value,
        refresh_token: token.refresh_token,
    })
}
