//! API Routes
//!
//! Route handlers organized by functionality.

pub mod health;
pub mod key;
pub mod price;

use std::future::Future;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::retrieval::RetrievalResult;

/// Run a retrieval under the configured request deadline
pub(crate) async fn with_deadline<T>(
    state: &AppState,
    work: impl Future<Output = RetrievalResult<T>>,
) -> ApiResult<T> {
    match tokio::time::timeout(state.request_timeout(), work).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(ApiError::Timeout(state.config.api.request_timeout_secs)),
    }
}
