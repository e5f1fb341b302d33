//! Price Routes
//!
//! Range queries over the partitioned price store.
//!
//! - GET /price/get/:params - `symbol,timeframe,range` query

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::{request_credentials, PriceParams, PriceResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::with_deadline;
use crate::api::state::AppState;
use crate::retrieval::{PriceQuery, RetrievalOrchestrator};

/// GET /price/get/:params
///
/// Resolve the range into day partitions, read up to `max_files` parquet
/// objects and return the merged rows inside the window.
pub async fn get_price(
    State(state): State<Arc<AppState>>,
    Path(params): Path<String>,
    query_params: Result<Query<PriceParams>, QueryRejection>,
) -> ApiResult<Json<PriceResponse>> {
    let Query(query_params) = query_params.map_err(|e| ApiError::Validation(e.body_text()))?;
    let defaults = &state.config.retrieval;
    let exchange = query_params
        .exchange
        .as_deref()
        .unwrap_or(&defaults.default_exchange);
    let max_files = query_params.max_files.unwrap_or(defaults.default_max_files);

    let query = PriceQuery::parse(&params, exchange, max_files)?;

    let credentials = request_credentials(
        query_params.aws_access_key.as_deref(),
        query_params.aws_secret_key.as_deref(),
        &state.config.store,
    )
    .map_err(ApiError::Validation)?;
    let store = state.store_provider.store_for(credentials.as_ref())?;

    let orchestrator = RetrievalOrchestrator::new(store).prefix_root(defaults.prefix_root.as_str());
    let result = with_deadline(&state, orchestrator.run(&query, Utc::now())).await?;

    Ok(Json(PriceResponse {
        symbol_partition: query.symbol_partition(),
        symbol: query.symbol,
        timeframe: query.timeframe,
        range: query.range,
        rows_returned: result.rows_returned(),
        files_read: result.files_read,
        data: result.table.rows,
    }))
}
