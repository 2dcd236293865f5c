/// Tenant endpoints
///
/// A tenant belongs to a property and may optionally be assigned to one of
/// its units. Creating or reassigning with a unit from a different property
/// is rejected.
///
/// # Endpoints
///
/// - `GET    /v1/properties/:id/tenants` - List tenants on a property
/// - `POST   /v1/tenants` - Create tenant
/// - `GET    /v1/tenants/:id` - Get tenant
/// - `PUT    /v1/tenants/:id` - Update tenant
/// - `DELETE /v1/tenants/:id` - Delete tenant

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
        authorization::{require_property_access, require_tenant_access, AccessLevel},
        middleware::AuthContext,
    },
    models::{
        tenant::{CreateTenant, Tenant, UpdateTenant},
        unit::Unit,
    },
};
use serde::Serialize;
use uuid::Uuid;

/// Tenant list response
#[derive(Debug, Serialize)]
pub struct ListTenantsResponse {
    /// Tenants on the property, active first
    pub tenants: Vec<Tenant>,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether the record was deleted
    pub deleted: bool,
}

/// Checks that a unit belongs to the expected property
async fn ensure_unit_on_property(
    state: &AppState,
    unit_id: Uuid,
    property_id: Uuid,
) -> ApiResult<()> {
    let unit = Unit::find_by_id(&state.db, unit_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Unit not found".to_string()))?;

    if unit.property_id != property_id {
        return Err(ApiError::BadRequest(
            "Unit does not belong to this property".to_string(),
        ));
    }

    Ok(())
}

/// Lists tenants on a property
pub async fn list_tenants(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(property_id): Path<Uuid>,
) -> ApiResult<Json<ListTenantsResponse>> {
    require_property_access(&state.db, auth.user_id, property_id, AccessLevel::View).await?;

    let tenants = Tenant::list_by_property(&state.db, property_id).await?;

    Ok(Json(ListTenantsResponse { tenants }))
}

/// Creates a tenant on a property, optionally assigned to a unit
pub async fn create_tenant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(data): Json<CreateTenant>,
) -> ApiResult<Json<Tenant>> {
    require_property_access(&state.db, auth.user_id, data.property_id, AccessLevel::Edit).await?;

    if let Some(unit_id) = data.unit_id {
        ensure_unit_on_property(&state, unit_id, data.property_id).await?;
    }

    let tenant = Tenant::create(&state.db, data).await?;

    Ok(Json(tenant))
}

/// Gets a tenant
pub async fn get_tenant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Tenant>> {
    require_tenant_access(&state.db, auth.user_id, id, AccessLevel::View).await?;

    let tenant = Tenant::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".to_string()))?;

    Ok(Json(tenant))
}

/// Updates a tenant
///
/// Reassigning to a unit verifies the unit is on the tenant's property.
pub async fn update_tenant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateTenant>,
) -> ApiResult<Json<Tenant>> {
    let property_id = require_tenant_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    if let Some(Some(unit_id)) = data.unit_id {
        ensure_unit_on_property(&state, unit_id, property_id).await?;
    }

    let tenant = Tenant::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".to_string()))?;

    Ok(Json(tenant))
}

/// Deletes a tenant
///
/// Leases and payments go with it; prefer deactivating when history
/// should be kept.
pub async fn delete_tenant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require_tenant_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    let deleted = Tenant::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
