#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use spotipulse::{api::Gateway, config::Config, server};
use tokio::net::TcpListener;

/// A request the mock upstream received.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

/// Scripted stand-in for both the Spotify accounts service and the Web API.
#[derive(Clone, Default)]
pub struct MockUpstream {
    routes: Arc<HashMap<(Method, String), (u16, String)>>,
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl MockUpstream {
    pub fn new(routes: Vec<(Method, &str, u16, &str)>) -> Self {
        let routes = routes
            .into_iter()
            .map(|(m, p, s, b)| ((m, p.to_string()), (s, b.to_string())))
            .collect();
        MockUpstream {
            routes: Arc::new(routes),
            ..Default::default()
        }
    }

    /// Serves the mock on an ephemeral port and returns its base URL.
    pub async fn start(&self) -> String {
        let app = Router::new().fallback(handle).with_state(self.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn hits_on(&self, path: &str) -> usize {
        self.seen().iter().filter(|s| s.path == path).count()
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last_on(&self, path: &str) -> Seen {
        self.seen()
            .into_iter()
            .rev()
            .find(|s| s.path == path)
            .unwrap_or_else(|| panic!("no request on {path}"))
    }
}

async fn handle(
    State(mock): State<MockUpstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    mock.seen.lock().unwrap().push(Seen {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    match mock.routes.get(&(method, uri.path().to_string())) {
        Some((status, body)) => (
            StatusCode::from_u16(*status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_IMPLEMENTED, "unexpected request").into_response(),
    }
}

/// A port nothing listens on.
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub const TOKEN_OK: &str =
    r#"{"access_token":"X","token_type":"Bearer","expires_in":3600,"scope":"user-top-read"}"#;

pub fn config_for(base: &str, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("SPOTIFY_CLIENT_ID".to_string(), "abc".to_string()),
        ("SPOTIFY_CLIENT_SECRET".to_string(), "secret".to_string()),
        ("SPOTIFY_REFRESH_TOKEN".to_string(), "r1".to_string()),
        ("SPOTIFY_API_URL".to_string(), format!("{base}/v1")),
        ("SPOTIFY_API_TOKEN_URL".to_string(), format!("{base}/api/token")),
        ("SPOTIFY_API_AUTH_URL".to_string(), format!("{base}/authorize")),
        ("HTTP_TIMEOUT_SECS".to_string(), "5".to_string()),
    ]);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// Starts the gateway with `config` and returns its base URL.
pub async fn start_gateway(config: Config) -> String {
    let gateway = Arc::new(Gateway::new(config).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        server::serve(listener, gateway).await.unwrap();
    });
    format!("http://{addr}")
}
