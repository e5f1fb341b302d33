//! Key Routes
//!
//! - GET /price/get_by_key?key= - Fetch one object by its full key

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{request_credentials, KeyParams, KeyResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::with_deadline;
use crate::api::state::AppState;
use crate::retrieval::{normalize_naive, ObjectFetcher};

/// GET /price/get_by_key
///
/// Timestamps come back as naive UTC strings; no range filter applies.
pub async fn get_by_key(
    State(state): State<Arc<AppState>>,
    params: Result<Query<KeyParams>, QueryRejection>,
) -> ApiResult<Json<KeyResponse>> {
    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;
    let key = params.key.trim();
    if key.is_empty() {
        return Err(ApiError::Validation("key must not be empty".to_string()));
    }

    let credentials = request_credentials(
        params.aws_access_key.as_deref(),
        params.aws_secret_key.as_deref(),
        &state.config.store,
    )
    .map_err(ApiError::Validation)?;
    let store = state.store_provider.store_for(credentials.as_ref())?;

    let fetcher = ObjectFetcher::new(store);
    let mut table = with_deadline(&state, fetcher.fetch_key(key)).await?;
    normalize_naive(&mut table);

    tracing::info!(key = %key, rows = table.len(), "Fetched object by key");

    Ok(Json(KeyResponse {
        key: key.to_string(),
        rows: table.len(),
        data: table.rows,
    }))
}
