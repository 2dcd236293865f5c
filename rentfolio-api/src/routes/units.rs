/// Unit endpoints
///
/// # Endpoints
///
/// - `GET    /v1/properties/:id/units` - List units on a property
/// - `POST   /v1/units` - Create unit
/// - `GET    /v1/units/:id` - Get unit
/// - `PUT    /v1/units/:id` - Update unit
/// - `DELETE /v1/units/:id` - Delete unit

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
        authorization::{require_property_access, require_unit_access, AccessLevel},
        middleware::AuthContext,
    },
    models::unit::{CreateUnit, Unit, UpdateUnit},
};
use serde::Serialize;
use uuid::Uuid;

/// Unit list response
#[derive(Debug, Serialize)]
pub struct ListUnitsResponse {
    /// Units on the property
    pub units: Vec<Unit>,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether the record was deleted
    pub deleted: bool,
}

/// Lists units on a property
pub async fn list_units(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(property_id): Path<Uuid>,
) -> ApiResult<Json<ListUnitsResponse>> {
    require_property_access(&state.db, auth.user_id, property_id, AccessLevel::View).await?;

    let units = Unit::list_by_property(&state.db, property_id).await?;

    Ok(Json(ListUnitsResponse { units }))
}

/// Creates a unit on a property
pub async fn create_unit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(data): Json<CreateUnit>,
) -> ApiResult<Json<Unit>> {
    require_property_access(&state.db, auth.user_id, data.property_id, AccessLevel::Edit).await?;

    let unit = Unit::create(&state.db, data).await?;

    Ok(Json(unit))
}

/// Gets a unit
pub async fn get_unit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Unit>> {
    require_unit_access(&state.db, auth.user_id, id, AccessLevel::View).await?;

    let unit = Unit::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Unit not found".to_string()))?;

    Ok(Json(unit))
}

/// Updates a unit
pub async fn update_unit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateUnit>,
) -> ApiResult<Json<Unit>> {
    require_unit_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    let unit = Unit::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Unit not found".to_string()))?;

    Ok(Json(unit))
}

/// Deletes a unit
///
/// Tenants assigned to the unit stay on the property with no unit.
pub async fn delete_unit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require_unit_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    let deleted = Unit::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
