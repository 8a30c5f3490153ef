//! Internship Search Server
//!
//! Runs Internshala searches on demand and exposes the results as JSON or
//! as a CSV download using Axum.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use common::{ListingRecord, QueryError, ResultSet, ResultSummary, SearchQuery, csv_export};
use internship_scraper::{ScrapeError, Scraper, ScraperConfig, report};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Default upper bound on pages a single request may ask for.
const DEFAULT_MAX_PAGES_LIMIT: u32 = 5;

/// API response wrapper
#[derive(Debug, Serialize)]
struct SearchResponse {
    query: String,
    total_results: usize,
    summary: ResultSummary,
    message: String,
    results: Vec<ListingRecord>,
}

/// Query parameters for the search endpoints
#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    position: Option<String>,
    location: Option<String>,
    pages: Option<u32>,
}

/// Shared application state
struct AppState {
    config: ScraperConfig,
    max_pages_limit: u32,
}

#[derive(Debug)]
enum ApiError {
    BadRequest(QueryError),
    Scrape(ScrapeError),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Scrape(e) => (StatusCode::BAD_GATEWAY, report::failure(&e)),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Validates the parameters; `pages` defaults to 1 and is clamped to `limit`.
fn build_query(params: &SearchParams, limit: u32) -> Result<SearchQuery, QueryError> {
    let pages = params.pages.unwrap_or(1).min(limit);
    SearchQuery::new(
        params.position.as_deref().unwrap_or_default(),
        params.location.as_deref().unwrap_or_default(),
        pages,
    )
}

/// Runs the scrape on a blocking worker with its own HTTP session.
async fn run_search(
    state: &AppState,
    params: &SearchParams,
) -> Result<(SearchQuery, ResultSet), ApiError> {
    let query = build_query(params, state.max_pages_limit).map_err(ApiError::BadRequest)?;
    let config = state.config.clone();
    let task_query = query.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        let scraper =
            Scraper::from_config(&config).map_err(|e| ApiError::Internal(e.to_string()))?;
        scraper
            .scrape(&task_query, &mut |msg: &str| info!("{}", msg))
            .map_err(ApiError::Scrape)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("search task failed: {e}")))?;

    outcome.map(|results| (query, results))
}

fn search_response(query: &SearchQuery, results: ResultSet) -> SearchResponse {
    SearchResponse {
        query: format!("{} in {}", query.position(), query.location()),
        total_results: results.len(),
        summary: results.summary(),
        message: report::summarize(&results),
        results: results.records,
    }
}

/// Handler for GET /search?position=<text>&location=<text>&pages=<n>
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let (query, results) = run_search(&state, &params).await?;
    info!(
        "Search {:?} in {:?}: {} results",
        query.position(),
        query.location(),
        results.len()
    );
    Ok(Json(search_response(&query, results)))
}

/// Handler for GET /search.csv, same parameters as /search
async fn csv_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (query, results) = run_search(&state, &params).await?;
    let body = csv_export::to_csv_string(&results.records).map_err(|e| {
        error!("CSV export failed: {}", e);
        ApiError::Internal(e.to_string())
    })?;
    let filename = csv_export::download_name(query.position(), query.location());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}

/// Handler for GET / (root)
async fn root_handler() -> &'static str {
    "🔍 Internship Finder API\n\nEndpoints:\n  GET /search?position=<text>&location=<text>&pages=<n> - Search as JSON\n  GET /search.csv?position=<text>&location=<text>&pages=<n> - Download as CSV\n\nExample:\n  curl 'http://127.0.0.1:3000/search?position=data%20analyst&location=bangalore'"
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/search", get(search_handler))
        .route("/search.csv", get(csv_handler))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var("SCRAPER_CONFIG").ok().map(PathBuf::from);
    let config = ScraperConfig::load(config_path.as_deref())?;
    // Fail at startup rather than on the first request.
    config.selectors.compile()?;

    let max_pages_limit = match std::env::var("MAX_PAGES_LIMIT") {
        Ok(raw) => raw
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("MAX_PAGES_LIMIT must be a positive number"))?,
        Err(_) => DEFAULT_MAX_PAGES_LIMIT,
    };
    anyhow::ensure!(max_pages_limit > 0, "MAX_PAGES_LIMIT must be a positive number");

    let state = Arc::new(AppState {
        config,
        max_pages_limit,
    });

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🌐 Server running at http://{}", addr);
    info!("   Try: curl 'http://{}/search?position=developer&location=delhi'", addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
