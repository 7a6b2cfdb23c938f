use anyhow::{Context, Result};
use axum::{extract::{Query, State}, http::StatusCode, routing::{get, post}, Json, Router};
use crawldex_core::{Language, QueryEngine, QueryResult, StopwordSet, Tokenizer};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod repl;

/// Where the index lives and how queries are tokenized and matched.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub index_path: PathBuf,
    pub language: Language,
    pub stopwords: Option<PathBuf>,
    pub first_match_only: bool,
}

impl EngineOptions {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self { index_path: index_path.into(), language: Language::default(), stopwords: None, first_match_only: true }
    }
}

pub fn load_engine(opts: &EngineOptions) -> Result<QueryEngine> {
    let stopwords = StopwordSet::resolve(opts.language, opts.stopwords.as_deref())?;
    let engine = QueryEngine::load(&opts.index_path, Tokenizer::new(stopwords))
        .with_context(|| format!("loading index {}", opts.index_path.display()))?;
    tracing::info!(index = %opts.index_path.display(), terms = engine.index().len(), "index loaded");
    Ok(engine.with_first_match_only(opts.first_match_only))
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub total_hits: usize,
    pub results: Vec<QueryResult>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<QueryEngine>>,
    pub options: Arc<EngineOptions>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(opts: EngineOptions, admin_token: Option<String>) -> Result<Self> {
        let engine = load_engine(&opts)?;
        Ok(Self { engine: Arc::new(RwLock::new(engine)), options: Arc::new(opts), admin_token })
    }
}

/// Load the index and build the router; the admin token comes from `ADMIN_TOKEN`.
pub fn build_app(opts: EngineOptions) -> Result<Router> {
    let app_state = AppState::new(opts, std::env::var("ADMIN_TOKEN").ok())?;
    Ok(router(app_state))
}

pub fn router(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/index/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let mut results = state.engine.read().search(&params.q);
    let total_hits = results.len();
    results.truncate(params.k.clamp(1, 100));
    let took_ms = start.elapsed().as_millis();
    tracing::debug!(query = %params.q, total_hits, took_ms = took_ms as u64, "search");
    Json(SearchResponse { query: params.q, took_ms, total_hits, results })
}

/// Re-read the index file from disk and swap it in.
async fn reload_handler(State(state): State<AppState>, headers: axum::http::HeaderMap) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let engine = load_engine(&state.options).map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")))?;
    let body = serde_json::json!({
        "terms": engine.index().len(),
        "documents": engine.index().document_count(),
    });
    *state.engine.write() = engine;
    Ok(Json(body))
}

fn authorize(state: &AppState, headers: &axum::http::HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
