/// Owner entity endpoints
///
/// Owners are legal entities (individuals or LLCs) holding title to
/// properties, separate from user accounts. Users hold roles on owners
/// through memberships; admins manage members, property links, and
/// invitations. Every owner must keep at least one admin.
///
/// # Endpoints
///
/// - `GET    /v1/owners` - List owners the user belongs to
/// - `POST   /v1/owners` - Create owner (creator becomes admin)
/// - `GET    /v1/owners/:id` - Get owner with members and property links
/// - `PUT    /v1/owners/:id` - Update owner (admin)
/// - `DELETE /v1/owners/:id` - Delete owner (admin)
/// - `GET    /v1/owners/:id/members` - List members
/// - `PUT    /v1/owners/:id/members/:user_id` - Change member role (admin)
/// - `DELETE /v1/owners/:id/members/:user_id` - Remove member (admin)
/// - `POST   /v1/owners/:id/properties` - Link property (admin + manage)
/// - `PUT    /v1/owners/:id/properties/:property_id` - Update stake (admin)
/// - `DELETE /v1/owners/:id/properties/:property_id` - Unlink (admin)

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
        authorization::{
            ensure_not_last_admin, require_owner_role, require_property_access, AccessLevel,
        },
        middleware::AuthContext,
    },
    models::{
        owner::{CreateOwner, Owner, PropertyOwner, UpdateOwner},
        user_owner::{OwnerRole, UserOwner},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owner list response
#[derive(Debug, Serialize)]
pub struct ListOwnersResponse {
    /// Owner entities the user belongs to
    pub owners: Vec<Owner>,
}

/// Owner detail with members and property links
#[derive(Debug, Serialize)]
pub struct OwnerDetailResponse {
    /// The owner entity
    #[serde(flatten)]
    pub owner: Owner,

    /// Role-bearing members
    pub members: Vec<UserOwner>,

    /// Linked properties with percentage stakes
    pub properties: Vec<PropertyOwner>,
}

/// Member list response
#[derive(Debug, Serialize)]
pub struct ListMembersResponse {
    /// Role-bearing members
    pub members: Vec<UserOwner>,
}

/// Change member role request
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleRequest {
    /// New role
    pub role: OwnerRole,
}

/// Link property request
#[derive(Debug, Deserialize)]
pub struct LinkPropertyRequest {
    /// Property to link
    pub property_id: Uuid,

    /// Percentage stake (defaults to 100)
    #[serde(default = "default_percent")]
    pub ownership_percent: f64,
}

fn default_percent() -> f64 {
    100.0
}

/// Update stake request
#[derive(Debug, Deserialize)]
pub struct UpdateLinkRequest {
    /// New percentage stake
    pub ownership_percent: f64,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether the record was deleted
    pub deleted: bool,
}

/// Lists owner entities the user holds a role on
pub async fn list_owners(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListOwnersResponse>> {
    let owners = Owner::list_for_user(&state.db, auth.user_id).await?;

    Ok(Json(ListOwnersResponse { owners }))
}

/// Creates an owner entity with the creator as admin
pub async fn create_owner(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(data): Json<CreateOwner>,
) -> ApiResult<Json<Owner>> {
    if data.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    }

    let owner = Owner::create_with_admin(&state.db, data, auth.user_id).await?;

    Ok(Json(owner))
}

/// Gets an owner entity with its members and property links
pub async fn get_owner(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OwnerDetailResponse>> {
    require_owner_role(&state.db, id, auth.user_id, OwnerRole::Viewer).await?;

    let owner = Owner::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Owner not found".to_string()))?;

    let members = UserOwner::list_by_owner(&state.db, id).await?;
    let properties = PropertyOwner::list_by_owner(&state.db, id).await?;

    Ok(Json(OwnerDetailResponse {
        owner,
        members,
        properties,
    }))
}

/// Updates an owner entity
pub async fn update_owner(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateOwner>,
) -> ApiResult<Json<Owner>> {
    require_owner_role(&state.db, id, auth.user_id, OwnerRole::Admin).await?;

    let owner = Owner::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Owner not found".to_string()))?;

    Ok(Json(owner))
}

/// Deletes an owner entity
///
/// Properties survive; they lose this owner's links.
pub async fn delete_owner(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require_owner_role(&state.db, id, auth.user_id, OwnerRole::Admin).await?;

    let deleted = Owner::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { deleted }))
}

/// Lists an owner's members
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ListMembersResponse>> {
    require_owner_role(&state.db, id, auth.user_id, OwnerRole::Viewer).await?;

    let members = UserOwner::list_by_owner(&state.db, id).await?;

    Ok(Json(ListMembersResponse { members }))
}

/// Changes a member's role
///
/// Demoting the last admin is rejected.
pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateMemberRoleRequest>,
) -> ApiResult<Json<UserOwner>> {
    require_owner_role(&state.db, id, auth.user_id, OwnerRole::Admin).await?;

    if req.role != OwnerRole::Admin {
        ensure_not_last_admin(&state.db, id, user_id).await?;
    }

    let membership = UserOwner::update_role(&state.db, id, user_id, req.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    Ok(Json(membership))
}

/// Removes a member from an owner entity
///
/// Removing the last admin is rejected.
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<DeleteResponse>> {
    require_owner_role(&state.db, id, auth.user_id, OwnerRole::Admin).await?;

    ensure_not_last_admin(&state.db, id, user_id).await?;

    let deleted = UserOwner::delete(&state.db, id, user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    Ok(Json(DeleteResponse { deleted }))
}

/// Links a property to an owner entity with a percentage stake
///
/// Requires admin on the owner and manage access on the property.
pub async fn link_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<LinkPropertyRequest>,
) -> ApiResult<Json<PropertyOwner>> {
    require_owner_role(&state.db, id, auth.user_id, OwnerRole::Admin).await?;
    require_property_access(&state.db, auth.user_id, req.property_id, AccessLevel::Manage).await?;

    if req.ownership_percent <= 0.0 {
        return Err(ApiError::BadRequest(
            "Ownership percent must be positive".to_string(),
        ));
    }

    let link = PropertyOwner::create(&state.db, req.property_id, id, req.ownership_percent).await?;

    Ok(Json(link))
}

/// Updates the percentage stake on a property link
pub async fn update_property_link(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((id, property_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateLinkRequest>,
) -> ApiResult<Json<PropertyOwner>> {
    require_owner_role(&state.db, id, auth.user_id, OwnerRole::Admin).await?;

    if req.ownership_percent <= 0.0 {
        return Err(ApiError::BadRequest(
            "Ownership percent must be positive".to_string(),
        ));
    }

    let link = PropertyOwner::update_percent(&state.db, property_id, id, req.ownership_percent)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property link not found".to_string()))?;

    Ok(Json(link))
}

/// Removes a property link from an owner entity
pub async fn unlink_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((id, property_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<DeleteResponse>> {
    require_owner_role(&state.db, id, auth.user_id, OwnerRole::Admin).await?;

    let deleted = PropertyOwner::delete(&state.db, property_id, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Property link not found".to_string()));
    }

    Ok(Json(DeleteResponse { deleted }))
}
