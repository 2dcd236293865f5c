/// Lease endpoints
///
/// Creating a lease deactivates the tenant's previous active lease; a
/// tenant is expected to hold one active lease at a time.
///
/// # Endpoints
///
/// - `GET    /v1/tenants/:id/leases` - List a tenant's leases
/// - `POST   /v1/leases` - Create lease
/// - `GET    /v1/leases/:id` - Get lease
/// - `PUT    /v1/leases/:id` - Update lease
/// - `DELETE /v1/leases/:id` - Delete lease

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
        authorization::{require_lease_access, require_tenant_access, AccessLevel},
        middleware::AuthContext,
    },
    models::lease::{CreateLease, Lease, UpdateLease},
};
use serde::Serialize;
use uuid::Uuid;

/// Lease list response
#[derive(Debug, Serialize)]
pub struct ListLeasesResponse {
    /// Leases, newest start date first
    pub leases: Vec<Lease>,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether the record was deleted
    pub deleted: bool,
}

/// Lists a tenant's leases
pub async fn list_leases(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<ListLeasesResponse>> {
    require_tenant_access(&state.db, auth.user_id, tenant_id, AccessLevel::View).await?;

    let leases = Lease::list_by_tenant(&state.db, tenant_id).await?;

    Ok(Json(ListLeasesResponse { leases }))
}

/// Creates a lease, retiring the tenant's previous active lease
pub async fn create_lease(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(data): Json<CreateLease>,
) -> ApiResult<Json<Lease>> {
    require_tenant_access(&state.db, auth.user_id, data.tenant_id, AccessLevel::Edit).await?;

    if data.rent_cents < 0 {
        return Err(ApiError::BadRequest("Rent cannot be negative".to_string()));
    }

    let lease = Lease::create(&state.db, data).await?;

    Ok(Json(lease))
}

/// Gets a lease
pub async fn get_lease(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Lease>> {
    require_lease_access(&state.db, auth.user_id, id, AccessLevel::View).await?;

    let lease = Lease::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lease not found".to_string()))?;

    Ok(Json(lease))
}

/// Updates a lease
pub async fn update_lease(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateLease>,
) -> ApiResult<Json<Lease>> {
    require_lease_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    if matches!(data.rent_cents, Some(rent) if rent < 0) {
        return Err(ApiError::BadRequest("Rent cannot be negative".to_string()));
    }

    let lease = Lease::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lease not found".to_string()))?;

    Ok(Json(lease))
}

/// Deletes a lease and its payments
pub async fn delete_lease(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require_lease_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    let deleted = Lease::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
