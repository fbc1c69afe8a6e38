mod common;

use std::{
    collections::{BTreeSet, HashMap},
    time::{Duration, Instant},
};

use axum::{
    Router,
    http::{Method, StatusCode},
    routing::post,
};
use reqwest::Client;
use spotipulse::{
    Error, Failure,
    spotify::{
        self,
        auth::{
            TokenCache, TokenProvider, authorization_header, basic_auth_header,
            build_authorize_url, form_body,
        },
    },
    types::{AccessToken, Credentials, GrantContext},
};
use url::{Url, form_urlencoded};

use common::{MockUpstream, TOKEN_OK, config_for, dead_url};

fn keys(grant: &GrantContext) -> BTreeSet<&'static str> {
    form_body(grant).into_iter().map(|(k, _)| k).collect()
}

fn refresh_grant() -> GrantContext {
    GrantContext::RefreshToken {
        refresh_token: "r1".to_string(),
    }
}

async fn provider_for(mock: &MockUpstream, credentials: Credentials) -> TokenProvider {
    let base = mock.start().await;
    TokenProvider::new(Client::new(), format!("{base}/api/token"), credentials)
}

#[test]
fn test_form_body_refresh_token() {
    let grant = refresh_grant();
    assert_eq!(keys(&grant), BTreeSet::from(["grant_type", "refresh_token"]));
    assert_eq!(
        form_body(&grant),
        vec![
            ("grant_type", "refresh_token".to_string()),
            ("refresh_token", "r1".to_string())
        ]
    );
}

#[test]
fn test_form_body_client_credentials() {
    let grant = GrantContext::ClientCredentials;
    assert_eq!(
        form_body(&grant),
        vec![("grant_type", "client_credentials".to_string())]
    );
}

#[test]
fn test_form_body_authorization_code() {
    let grant = GrantContext::AuthorizationCode {
        code: "c0de".to_string(),
        redirect_uri: "https://hyperoot.dev/callback".to_string(),
    };
    let body: HashMap<_, _> = form_body(&grant).into_iter().collect();

    assert_eq!(body.len(), 3);
    assert_eq!(body["grant_type"], "authorization_code");
    assert_eq!(body["code"], "c0de");
    assert_eq!(body["redirect_uri"], "https://hyperoot.dev/callback");
}

#[test]
fn test_authorization_header_is_plain_formatting() {
    for value in ["X", "", "a b c", "BQD-long.token_value"] {
        let token = AccessToken {
            value: value.to_string(),
            obtained_at: 0,
            ttl_seconds: 0,
            refresh_token: None,
        };
        assert_eq!(authorization_header(&token), format!("Bearer {value}"));
    }
}

#[test]
fn test_basic_auth_header() {
    let creds = Credentials::new("abc", "secret");
    assert_eq!(basic_auth_header(&creds), "Basic YWJjOnNlY3JldA==");
}

#[test]
fn test_build_authorize_url() {
    let creds = Credentials::new("abc", "secret");
    let url = build_authorize_url(
        &creds,
        "https://accounts.spotify.com/authorize",
        "https://hyperoot.dev/callback",
        &["user-top-read", "streaming"],
    );

    let parsed = Url::parse(&url).unwrap();
    assert_eq!(parsed.host_str(), Some("accounts.spotify.com"));
    assert_eq!(parsed.path(), "/authorize");

    let query: HashMap<String, String> = parsed.query_pairs().into_owned().collect();
    let expected: HashMap<String, String> = [
        ("client_id", "abc"),
        ("response_type", "code"),
        ("redirect_uri", "https://hyperoot.dev/callback"),
        ("scope", "user-top-read streaming"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    assert_eq!(query, expected);
}

#[test]
fn test_credentials_debug_hides_secret() {
    let creds = Credentials::new("abc", "top-secret");
    let printed = format!("{creds:?}");
    assert!(printed.contains("abc"));
    assert!(!printed.contains("top-secret"));
}

#[tokio::test]
async fn test_acquire_success() {
    let mock = MockUpstream::new(vec![(Method::POST, "/api/token", 200, TOKEN_OK)]);
    let provider = provider_for(&mock, Credentials::new("abc", "secret")).await;

    let token = provider.acquire(refresh_grant()).await.unwrap();
    assert_eq!(token.value, "X");
    assert_eq!(token.ttl_seconds, 3600);
    assert_eq!(token.refresh_token, None);
    assert!(token.obtained_at > 0);

    let seen = mock.last_on("/api/token");
    assert_eq!(seen.authorization.as_deref(), Some("Basic YWJjOnNlY3JldA=="));
    let form: HashMap<String, String> = form_urlencoded::parse(seen.body.as_bytes())
        .into_owned()
        .collect();
    assert_eq!(form.len(), 2);
    assert_eq!(form["grant_type"], "refresh_token");
    assert_eq!(form["refresh_token"], "r1");
}

#[tokio::test]
async fn test_acquire_authorization_code_returns_refresh_token() {
    let mock = MockUpstream::new(vec![(
        Method::POST,
        "/api/token",
        200,
        r#"{"access_token":"A","token_type":"Bearer","expires_in":3600,"refresh_token":"R"}"#,
    )]);
    let provider = provider_for(&mock, Credentials::new("abc", "secret")).await;

    let token = provider
        .acquire(GrantContext::AuthorizationCode {
            code: "c0de".to_string(),
            redirect_uri: "https://hyperoot.dev/callback".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(token.value, "A");
    assert_eq!(token.refresh_token.as_deref(), Some("R"));
}

#[tokio::test]
async fn test_acquire_non_200_is_auth_error() {
    let body = r#"{"error":"invalid_grant","error_description":"Invalid refresh token"}"#;
    let mock = MockUpstream::new(vec![(Method::POST, "/api/token", 400, body)]);
    let provider = provider_for(&mock, Credentials::new("abc", "secret")).await;

    match provider.acquire(refresh_grant()).await {
        Err(Error::Auth(Failure::Status { status, body: got })) => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(got, body);
        }
        other => panic!("expected auth status error, got {other:?}"),
    }
    assert_eq!(mock.hits(), 1);
}

#[tokio::test]
async fn test_acquire_undecodable_body_is_auth_error() {
    let mock = MockUpstream::new(vec![(Method::POST, "/api/token", 200, "not json")]);
    let provider = provider_for(&mock, Credentials::new("abc", "secret")).await;

    let err = provider.acquire(refresh_grant()).await.unwrap_err();
    assert!(matches!(err, Error::Auth(Failure::Transport(_))));
}

#[tokio::test]
async fn test_acquire_network_failure_is_auth_error() {
    let base = dead_url().await;
    let provider = TokenProvider::new(
        Client::new(),
        format!("{base}/api/token"),
        Credentials::new("abc", "secret"),
    );

    let err = provider.acquire(refresh_grant()).await.unwrap_err();
    match err {
        Error::Auth(failure @ Failure::Transport(_)) => assert_eq!(failure.status(), None),
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_credentials_fail_before_network() {
    let mock = MockUpstream::new(vec![(Method::POST, "/api/token", 200, TOKEN_OK)]);
    let base = mock.start().await;

    for creds in [Credentials::new("", "secret"), Credentials::new("abc", "")] {
        let provider =
            TokenProvider::new(Client::new(), format!("{base}/api/token"), creds);
        let err = provider.acquire(refresh_grant()).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    let provider = TokenProvider::new(
        Client::new(),
        format!("{base}/api/token"),
        Credentials::new("abc", "secret"),
    );
    let err = provider
        .acquire(GrantContext::RefreshToken {
            refresh_token: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    assert_eq!(mock.hits(), 0);
}

#[tokio::test]
async fn test_token_cache_reuses_fresh_token() {
    let mock = MockUpstream::new(vec![(Method::POST, "/api/token", 200, TOKEN_OK)]);
    let provider = provider_for(&mock, Credentials::new("abc", "secret")).await;
    let cache = TokenCache::new();

    let first = cache.get_or_acquire(&provider, refresh_grant()).await.unwrap();
    let second = cache.get_or_acquire(&provider, refresh_grant()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(mock.hits(), 1);

    cache
        .get_or_acquire(&provider, GrantContext::ClientCredentials)
        .await
        .unwrap();
    assert_eq!(mock.hits(), 2);

    let other = TokenCache::new();
    other.get_or_acquire(&provider, refresh_grant()).await.unwrap();
    assert_eq!(mock.hits(), 3);
}

#[tokio::test]
async fn test_token_cache_skips_authorization_code() {
    let mock = MockUpstream::new(vec![(Method::POST, "/api/token", 200, TOKEN_OK)]);
    let provider = provider_for(&mock, Credentials::new("abc", "secret")).await;
    let cache = TokenCache::new();

    for _ in 0..2 {
        cache
            .get_or_acquire(
                &provider,
                GrantContext::AuthorizationCode {
                    code: "c0de".to_string(),
                    redirect_uri: "https://hyperoot.dev/callback".to_string(),
                },
            )
            .await
            .unwrap();
    }
    assert_eq!(mock.hits(), 2);
}

#[tokio::test]
async fn test_token_cache_refetches_short_lived_token() {
    let mock = MockUpstream::new(vec![(
        Method::POST,
        "/api/token",
        200,
        r#"{"access_token":"X","token_type":"Bearer","expires_in":60}"#,
    )]);
    let provider = provider_for(&mock, Credentials::new("abc", "secret")).await;
    let cache = TokenCache::new();

    cache.get_or_acquire(&provider, refresh_grant()).await.unwrap();
    cache.get_or_acquire(&provider, refresh_grant()).await.unwrap();
    assert_eq!(mock.hits(), 2);
}

#[tokio::test]
async fn test_acquire_gives_up_after_configured_timeout() {
    let app = Router::new().route(
        "/api/token",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            TOKEN_OK
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = config_for(&base, &[("HTTP_TIMEOUT_SECS", "1")]);
    let provider = TokenProvider::from_config(&config, spotify::http_client(&config).unwrap());

    let started = Instant::now();
    let err = provider.acquire(refresh_grant()).await.unwrap_err();
    let elapsed = started.elapsed();

    match err {
        Error::Auth(Failure::Transport(e)) => assert!(e.is_timeout(), "{e}"),
        other => panic!("expected transport timeout, got {other:?}"),
    }
    assert!(elapsed >= Duration::from_millis(900), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "{elapsed:?}");
}
