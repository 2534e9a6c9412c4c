//! HTTP API over the reputation aggregator.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::net::TcpListener;
use std::sync::Arc;

use crate::aggregator::ReputationAggregator;
use crate::chains;
use crate::utils::error::{Error, Result};
use crate::utils::types::ChainId;

/// Chain used when a request omits `chain_id`.
pub const DEFAULT_CHAIN: ChainId = chains::ETHEREUM_SEPOLIA;

#[derive(Debug, Deserialize)]
struct ReputationQuery {
    chain_id: Option<String>,
}

struct ApiError(Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            | Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            | _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

/// Routes: `/healthz`, `/metrics`, `/chains`, `/reputation/:address`.
pub fn router(aggregator: Arc<ReputationAggregator>) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/chains", get(list_chains))
        .route("/reputation/:address", get(reputation))
        .with_state(aggregator)
}

/// Serve the API on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, aggregator: Arc<ReputationAggregator>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    listener.set_nonblocking(true)?;
    let addr = listener.local_addr()?;
    log::info!("Serving reputation API on http://{}", addr);

    axum::Server::from_tcp(listener)
        .map_err(|e| Error::Other(format!("failed to create server from listener: {}", e)))?
        .serve(router(aggregator).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::Other(format!("server error: {}", e)))
}

async fn health() -> impl IntoResponse {
    "OK"
}

async fn metrics_handler() -> impl IntoResponse {
    crate::metrics::render()
}

async fn list_chains() -> impl IntoResponse {
    Json(chains::all())
}

async fn reputation(
    State(aggregator): State<Arc<ReputationAggregator>>, Path(address): Path<String>,
    Query(query): Query<ReputationQuery>,
) -> std::result::Result<Response, ApiError> {
    let chain = match query.chain_id.as_deref() {
        | Some(raw) => raw.parse::<ChainId>()?,
        | None => DEFAULT_CHAIN,
    };
    let result = aggregator.compute_reputation(&address, chain).await?;
    Ok(Json(result).into_response())
}
