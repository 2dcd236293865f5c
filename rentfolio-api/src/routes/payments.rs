/// Rent payment endpoints
///
/// # Endpoints
///
/// - `GET    /v1/leases/:id/payments` - List payments on a lease
/// - `POST   /v1/payments` - Record payment
/// - `PUT    /v1/payments/:id` - Correct payment
/// - `DELETE /v1/payments/:id` - Delete payment

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use rentfolio_shared::{
    auth::{
        authorization::{require_lease_access, require_payment_access, AccessLevel},
        middleware::AuthContext,
    },
    models::payment::{CreatePayment, Payment, UpdatePayment},
};
use serde::Serialize;
use uuid::Uuid;

/// Payment list response
#[derive(Debug, Serialize)]
pub struct ListPaymentsResponse {
    /// Payments, newest first
    pub payments: Vec<Payment>,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether the record was deleted
    pub deleted: bool,
}

/// Lists payments on a lease
pub async fn list_payments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(lease_id): Path<Uuid>,
) -> ApiResult<Json<ListPaymentsResponse>> {
    require_lease_access(&state.db, auth.user_id, lease_id, AccessLevel::View).await?;

    let payments = Payment::list_by_lease(&state.db, lease_id).await?;

    Ok(Json(ListPaymentsResponse { payments }))
}

/// Records a rent payment against a lease
pub async fn create_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(data): Json<CreatePayment>,
) -> ApiResult<Json<Payment>> {
    require_lease_access(&state.db, auth.user_id, data.lease_id, AccessLevel::Edit).await?;

    if data.amount_cents <= 0 {
        return Err(ApiError::BadRequest(
            "Payment amount must be positive".to_string(),
        ));
    }

    let payment = Payment::create(&state.db, data).await?;

    Ok(Json(payment))
}

/// Corrects a payment record
pub async fn update_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdatePayment>,
) -> ApiResult<Json<Payment>> {
    require_payment_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    if matches!(data.amount_cents, Some(amount) if amount <= 0) {
        return Err(ApiError::BadRequest(
            "Payment amount must be positive".to_string(),
        ));
    }

    let payment = Payment::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;

    Ok(Json(payment))
}

/// Deletes a payment record
pub async fn delete_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require_payment_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    let deleted = Payment::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
