//! # Route Handlers
//!
//! ```text
//! POST /check_out   201 CheckOutResponse
//! POST /check_in    200 CheckInResponse
//! GET  /health      200 "OK" / 503 "Unavailable"
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use reel_core::{CheckInReceipt, CheckOutReceipt, CustomerId, RentalId, VideoId};

use crate::error::ApiError;
use crate::params::RentalParams;
use crate::state::AppState;

// =============================================================================
// Response Bodies
// =============================================================================

/// Body of a successful check-out.
#[derive(Debug, Serialize)]
pub struct CheckOutResponse {
    pub id: RentalId,
    pub customer_id: CustomerId,
    pub video_id: VideoId,
    pub due_date: NaiveDate,
    pub videos_checked_out_count: i64,
    pub available_inventory: i64,
}

impl From<CheckOutReceipt> for CheckOutResponse {
    fn from(receipt: CheckOutReceipt) -> Self {
        CheckOutResponse {
            id: receipt.rental.id,
            customer_id: receipt.rental.customer_id,
            video_id: receipt.rental.video_id,
            due_date: receipt.rental.due_date,
            videos_checked_out_count: receipt.videos_checked_out_count,
            available_inventory: receipt.available_inventory,
        }
    }
}

/// Body of a successful check-in.
#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub customer_id: CustomerId,
    pub video_id: VideoId,
    pub videos_checked_out_count: i64,
    pub available_inventory: i64,
}

impl From<CheckInReceipt> for CheckInResponse {
    fn from(receipt: CheckInReceipt) -> Self {
        CheckInResponse {
            customer_id: receipt.customer_id,
            video_id: receipt.video_id,
            videos_checked_out_count: receipt.videos_checked_out_count,
            available_inventory: receipt.available_inventory,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn resolve_ids(params: RentalParams, operation: &'static str) -> Result<(CustomerId, VideoId), ApiError> {
    params.ids().ok_or_else(|| {
        warn!(
            operation,
            customer_id = ?params.customer_id,
            video_id = ?params.video_id,
            "Missing or unusable id"
        );
        ApiError::NotFound
    })
}

/// `POST /check_out`
pub async fn check_out(
    State(state): State<AppState>,
    params: RentalParams,
) -> Result<(StatusCode, Json<CheckOutResponse>), ApiError> {
    let (customer_id, video_id) = resolve_ids(params, "check_out")?;

    let receipt = state.service.check_out(customer_id, video_id).await.map_err(|e| {
        warn!(customer_id = %customer_id, video_id = %video_id, error = %e, "Check-out rejected");
        ApiError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(receipt.into())))
}

/// `POST /check_in`
pub async fn check_in(
    State(state): State<AppState>,
    params: RentalParams,
) -> Result<Json<CheckInResponse>, ApiError> {
    let (customer_id, video_id) = resolve_ids(params, "check_in")?;

    let receipt = state.service.check_in(customer_id, video_id).await.map_err(|e| {
        warn!(customer_id = %customer_id, video_id = %video_id, error = %e, "Check-in rejected");
        ApiError::from(e)
    })?;

    Ok(Json(receipt.into()))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, "OK")
    } else {
        warn!("Health check failed");
        (StatusCode::SERVICE_UNAVAILABLE, "Unavailable")
    }
}
