use axum::{extract::State, http::StatusCode, Extension, Json};

use crate::middleware::RequestId;

use super::{ApiError, AppState, StatusMessage};

const INGEST_FAILED: &str = "Failed to ingest data.";

/// Runs one ingestion for the configured shop.
pub(super) async fn ingest(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<StatusMessage>, ApiError> {
    let credentials = state.config.default_credentials();

    match state.pipeline.run(&credentials).await {
        Ok(summary) => Ok(Json(StatusMessage {
            status: "success",
            message: summary.message(),
        })),
        Err(err) => {
            tracing::error!(
                request_id = %req_id.0,
                shop = %credentials.shop,
                kind = err.kind(),
                error = %err,
                "ingestion failed"
            );
            Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, INGEST_FAILED))
        }
    }
}
