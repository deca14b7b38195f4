//! Static host for the built page.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Instant, SystemTime, UNIX_EPOCH},
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_STATIC_MAX_AGE_SECONDS: u64 = 3_600;
const DEFAULT_LOG_LEVEL: &str = "info";

const STATIC_MAX_AGE_SECONDS_BOUNDS: (u64, u64) = (0, 31_536_000);
const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server stopped: {0}")]
    Serve(#[source] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub dist_dir: PathBuf,
    pub static_max_age_seconds: u64,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .filter(|port| *port > 0)
            .unwrap_or(DEFAULT_PORT);
        let dist_dir = parse_non_empty_string(lookup("SITE_DIST_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR));
        let static_max_age_seconds = parse_u64_with_bounds(
            lookup("STATIC_MAX_AGE_SECONDS"),
            DEFAULT_STATIC_MAX_AGE_SECONDS,
            STATIC_MAX_AGE_SECONDS_BOUNDS,
        );

        Self {
            port,
            dist_dir,
            static_max_age_seconds,
        }
    }
}

#[derive(Clone)]
struct AppState {
    config: Arc<ServerConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthPayload {
    ok: bool,
    version: &'static str,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let _ = tracing_subscriber::fmt().json().with_env_filter(filter).try_init();
}

pub fn router(config: ServerConfig) -> Router {
    let static_service =
        ServeDir::new(&config.dist_dir).not_found_service(ServeFile::new(config.dist_dir.join("index.html")));
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(static_service)
        .layer(middleware::from_fn_with_state(state.clone(), annotate_response))
        .with_state(state)
}

pub async fn run() -> Result<(), ServerError> {
    init_tracing();
    let config = ServerConfig::from_env();
    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

    serve_on(listener, config).await
}

pub async fn serve_on(listener: TcpListener, config: ServerConfig) -> Result<(), ServerError> {
    if !config.dist_dir.join("index.html").is_file() {
        warn!(
            event = "site_index_missing",
            dist_dir = %config.dist_dir.display(),
            "run `trunk build --release` first"
        );
    }

    let address = listener
        .local_addr()
        .map(|address| address.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    info!(event = "server_listening", address = %address, dist_dir = %config.dist_dir.display());

    axum::serve(listener, router(config)).await.map_err(ServerError::Serve)
}

async fn healthz() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))],
        Json(HealthPayload {
            ok: true,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

async fn annotate_response(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = resolve_request_id(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let status = response.status();

    if !response.headers().contains_key(header::CACHE_CONTROL) {
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        let policy = cache_policy(status, content_type, state.config.static_max_age_seconds);
        response.headers_mut().insert(header::CACHE_CONTROL, cache_control(&policy));
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    info!(
        event = "request_completed",
        request_id = %request_id,
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    );

    response
}

/// HTML is revalidated on every load so a new build is picked up; other
/// successful assets may be cached for `max_age` seconds.
fn cache_policy(status: StatusCode, content_type: Option<&str>, max_age: u64) -> String {
    let is_html = content_type.is_some_and(|value| value.starts_with("text/html"));

    if !status.is_success() || is_html {
        "no-cache".to_string()
    } else {
        format!("public, max-age={max_age}")
    }
}

fn cache_control(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static("no-store"))
}

fn parse_u64_with_bounds(raw: Option<String>, default: u64, bounds: (u64, u64)) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_non_empty_string(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(generate_request_id)
}
