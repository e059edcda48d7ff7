use crate::catalog::{ListingResponse, ShowCatalog};
use crate::chart::{ChartRenderer, ChartSpec};
use crate::config::Config;
use crate::error::CatalogError;
use crate::models::ShowRecord;
use crate::params::{ListingParams, StatsFormat, StatsParams};
use crate::store::{MemoryStore, ShowStore};
use anyhow::{Context, Result};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::{path::Path, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ShowCatalog>,
    pub renderer: Option<Arc<dyn ChartRenderer>>,
}

pub async fn run_server(config: Config) -> Result<()> {
    let store: Arc<dyn ShowStore> = Arc::new(match &config.data_path {
        Some(path) => load_store(path).await?,
        None => {
            warn!("TVSHELF_DATA not set, starting with an empty store");
            MemoryStore::new()
        }
    });
    info!("Store holds {} shows", store.count().await?);

    // No renderer ships with the server; format=image answers 501 until one is plugged in.
    warn!("No chart renderer configured, image statistics are unavailable");
    let state = AppState {
        catalog: Arc::new(ShowCatalog::new(store, config.public_url.clone())),
        renderer: None,
    };
    info!("Links will be rooted at {}", config.public_url);

    let app = build_router(state).layer(TraceLayer::new_for_http());

    info!("Listening on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn load_store(path: &Path) -> Result<MemoryStore> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read show data from {}", path.display()))?;
    let records: Vec<ShowRecord> = serde_json::from_slice(&raw)
        .with_context(|| format!("Invalid show data in {}", path.display()))?;
    info!("Loaded {} shows from {}", records.len(), path.display());
    MemoryStore::from_records(records).context("Show data rejected")
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/tv-shows", get(list_shows))
        .route("/tv-shows/statistics", get(show_statistics))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

type RawQuery = Result<Query<Vec<(String, String)>>, QueryRejection>;

fn query_pairs(query: RawQuery) -> Result<Vec<(String, String)>, CatalogError> {
    query
        .map(|Query(pairs)| pairs)
        .map_err(|rejection| {
            logged(CatalogError::invalid(
                "query",
                rejection.body_text(),
                "could not be parsed",
            ))
        })
}

async fn list_shows(
    State(state): State<AppState>,
    query: RawQuery,
) -> Result<Json<ListingResponse>, CatalogError> {
    let params = ListingParams::from_pairs(&query_pairs(query)?);
    state.catalog.list(&params).await.map(Json).map_err(logged)
}

async fn show_statistics(
    State(state): State<AppState>,
    query: RawQuery,
) -> Result<Response, CatalogError> {
    let params = StatsParams::from_pairs(&query_pairs(query)?);
    let (request, report) = state.catalog.statistics(&params).await.map_err(logged)?;
    match request.format {
        StatsFormat::Json => Ok(Json(report).into_response()),
        StatsFormat::Image => {
            let renderer = state
                .renderer
                .as_ref()
                .ok_or(CatalogError::RenderUnavailable)
                .map_err(logged)?;
            let chart = ChartSpec::from_report(request.by, &report);
            let rendered = renderer
                .render(&chart)
                .await
                .map_err(|e| logged(CatalogError::Render(e.to_string())))?;
            Ok(([(header::CONTENT_TYPE, rendered.content_type)], rendered.bytes).into_response())
        }
    }
}

fn logged(err: CatalogError) -> CatalogError {
    match &err {
        CatalogError::Validation { .. } | CatalogError::RenderUnavailable => {
            warn!("Rejected request: {}", err)
        }
        CatalogError::NotFound(msg) => info!("Nothing to return: {}", msg),
        CatalogError::Store(_) | CatalogError::Render(_) => error!("Request failed: {}", err),
    }
    err
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
