/// Parking permit endpoints
///
/// Issuing a permit writes the initial `issued` entry to its activity log;
/// later events (renewals, violations, revocations) are appended through
/// the activity endpoint.
///
/// # Endpoints
///
/// - `GET    /v1/properties/:id/parking-permits` - List permits
/// - `POST   /v1/parking-permits` - Issue permit
/// - `DELETE /v1/parking-permits/:id` - Delete permit
/// - `GET    /v1/parking-permits/:id/activity` - List activity log
/// - `POST   /v1/parking-permits/:id/activity` - Append activity entry

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
        authorization::{require_permit_access, require_property_access, AccessLevel},
        middleware::AuthContext,
    },
    models::parking::{
        CreateParkingPermit, ParkingAction, ParkingActivity, ParkingPermit,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permit list response
#[derive(Debug, Serialize)]
pub struct ListPermitsResponse {
    /// Permits on the property, newest first
    pub permits: Vec<ParkingPermit>,
}

/// Activity log response
#[derive(Debug, Serialize)]
pub struct ListActivityResponse {
    /// Log entries, newest first
    pub activity: Vec<ParkingActivity>,
}

/// Append activity request
#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    /// Kind of event
    pub action: ParkingAction,

    /// Free-form note
    pub note: Option<String>,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether the record was deleted
    pub deleted: bool,
}

/// Lists permits on a property
pub async fn list_permits(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(property_id): Path<Uuid>,
) -> ApiResult<Json<ListPermitsResponse>> {
    require_property_access(&state.db, auth.user_id, property_id, AccessLevel::View).await?;

    let permits = ParkingPermit::list_by_property(&state.db, property_id).await?;

    Ok(Json(ListPermitsResponse { permits }))
}

/// Issues a parking permit
pub async fn create_permit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(data): Json<CreateParkingPermit>,
) -> ApiResult<Json<ParkingPermit>> {
    require_property_access(&state.db, auth.user_id, data.property_id, AccessLevel::Edit).await?;

    let permit = ParkingPermit::create(&state.db, data).await?;

    Ok(Json(permit))
}

/// Deletes a permit and its activity log
pub async fn delete_permit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require_permit_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    let deleted = ParkingPermit::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { deleted }))
}

/// Lists a permit's activity log
pub async fn list_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(permit_id): Path<Uuid>,
) -> ApiResult<Json<ListActivityResponse>> {
    require_permit_access(&state.db, auth.user_id, permit_id, AccessLevel::View).await?;

    let activity = ParkingActivity::list_by_permit(&state.db, permit_id).await?;

    Ok(Json(ListActivityResponse { activity }))
}

/// Appends an event to a permit's activity log
pub async fn create_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(permit_id): Path<Uuid>,
    Json(req): Json<CreateActivityRequest>,
) -> ApiResult<Json<ParkingActivity>> {
    require_permit_access(&state.db, auth.user_id, permit_id, AccessLevel::Edit).await?;

    if req.action == ParkingAction::Issued {
        return Err(ApiError::BadRequest(
            "Issuance is logged automatically when the permit is created".to_string(),
        ));
    }

    let activity = ParkingActivity::create(&state.db, permit_id, req.action, req.note).await?;

    Ok(Json(activity))
}
