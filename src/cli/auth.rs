use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    config::{Config, SCOPES},
    error, info,
    spotify::{
        self, SpotifyClient,
        auth::{TokenProvider, authorization_header, build_authorize_url},
    },
    success,
    types::GrantContext,
    utils, warning,
};

/// Runs the authorization-code flow once from the terminal.
///
/// 1. Prints the consent URL and tries to open it in the default browser
/// 2. Reads the URL the browser was redirected to from stdin
/// 3. Exchanges the contained code for a token pair
/// 4. Prints the refresh token to store in `SPOTIFY_REFRESH_TOKEN`
/// 5. Lists the top tracks with the new access token as a smoke test
///
/// The redirect target does not need to be served by anything; the code is
/// read from the address bar.
pub async fn auth(config: &Config) {
    let auth_url = build_authorize_url(
        &config.credentials,
        &config.auth_url,
        &config.redirect_uri,
        &SCOPES,
    );

    info!("Go to this URL and authorize:\n{}", auth_url);
    if webbrowser::open(&auth_url).is_err() {
        warning!("Failed to open browser. Please navigate to the URL above manually.");
    }

    info!("Paste the full redirect URL here:");
    let mut line = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());
    if let Err(e) = stdin.read_line(&mut line).await {
        error!("Cannot read redirect URL. Err: {}", e);
    }

    let Some(code) = utils::extract_code(&line) else {
        error!("Authorization code not found in the URL.");
    };

    let http = match spotify::http_client(config) {
        Ok(c) => c,
        Err(e) => error!("{}", e),
    };
    let provider = TokenProvider::from_config(config, http.clone());
    let token = match provider
        .acquire(GrantContext::AuthorizationCode {
            code,
            redirect_uri: config.redirect_uri.clone(),
        })
        .await
    {
        Ok(t) => t,
        Err(e) => error!("Failed to exchange code for token. Err: {}", e),
    };

    match &token.refresh_token {
        Some(refresh_token) => success!("Save this refresh token securely: {}", refresh_token),
        None => warning!("Spotify did not return a refresh token."),
    }

    let client = SpotifyClient::from_config(config, http);
    match client.top_tracks(&authorization_header(&token)).await {
        Ok(tracks) => {
            info!("Your Top 10 Tracks:");
            for track in &tracks {
                println!("{}", utils::format_track_line(track));
            }
        }
        Err(e) => warning!("Failed to fetch top tracks. Err: {}", e),
    }
}
