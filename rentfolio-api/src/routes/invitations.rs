/// Invitation endpoints
///
/// Admins invite users onto an owner entity by email. Creation returns
/// the plaintext token exactly once; only its hash is stored. The invitee
/// registers (or logs in) and posts the token to the accept endpoint.
///
/// # Endpoints
///
/// - `GET    /v1/owners/:id/invitations` - List invitations (admin)
/// - `POST   /v1/owners/:id/invitations` - Create invitation (admin)
/// - `POST   /v1/invitations/accept` - Accept an invitation token
/// - `DELETE /v1/invitations/:id` - Revoke a pending invitation (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use rentfolio_shared::{
    auth::{authorization::require_owner_role, middleware::AuthContext},
    models::{
        invitation::{CreateInvitation, Invitation},
        user_owner::{OwnerRole, UserOwner},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Invitation list response
#[derive(Debug, Serialize)]
pub struct ListInvitationsResponse {
    /// Invitations for the owner, newest first
    pub invitations: Vec<Invitation>,
}

/// Create invitation request (owner id comes from the path)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    /// Invitee email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Role granted on acceptance (defaults to Viewer)
    #[serde(default = "default_role")]
    pub role: OwnerRole,
}

fn default_role() -> OwnerRole {
    OwnerRole::Viewer
}

/// Create invitation response
///
/// The token appears here and nowhere else; clients must hand it to
/// the invitee immediately.
#[derive(Debug, Serialize)]
pub struct CreateInvitationResponse {
    /// The created invitation
    #[serde(flatten)]
    pub invitation: Invitation,

    /// Plaintext invitation token, shown once
    pub token: String,
}

/// Accept invitation request
#[derive(Debug, Deserialize)]
pub struct AcceptInvitationRequest {
    /// Plaintext invitation token
    pub token: String,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether the record was deleted
    pub deleted: bool,
}

/// Lists invitations for an owner entity
pub async fn list_invitations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(owner_id): Path<Uuid>,
) -> ApiResult<Json<ListInvitationsResponse>> {
    require_owner_role(&state.db, owner_id, auth.user_id, OwnerRole::Admin).await?;

    let invitations = Invitation::list_by_owner(&state.db, owner_id).await?;

    Ok(Json(ListInvitationsResponse { invitations }))
}

/// Creates an invitation and returns the plaintext token once
pub async fn create_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(owner_id): Path<Uuid>,
    Json(req): Json<CreateInvitationRequest>,
) -> ApiResult<Json<CreateInvitationResponse>> {
    require_owner_role(&state.db, owner_id, auth.user_id, OwnerRole::Admin).await?;

    req.validate().map_err(ApiError::from_validation)?;

    let (invitation, token) = Invitation::create(
        &state.db,
        CreateInvitation {
            owner_id,
            email: req.email,
            role: req.role,
            created_by: auth.user_id,
        },
    )
    .await?;

    Ok(Json(CreateInvitationResponse { invitation, token }))
}

/// Accepts an invitation token, joining the caller to the owner entity
pub async fn accept_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<AcceptInvitationRequest>,
) -> ApiResult<Json<UserOwner>> {
    let invitation = Invitation::accept(&state.db, &req.token, auth.user_id).await?;

    let membership = UserOwner::find(&state.db, invitation.owner_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::InternalError("Membership not recorded".to_string()))?;

    Ok(Json(membership))
}

/// Revokes a pending invitation
///
/// Accepted invitations stay as audit records and cannot be revoked.
pub async fn revoke_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let invitation = Invitation::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    require_owner_role(&state.db, invitation.owner_id, auth.user_id, OwnerRole::Admin).await?;

    if invitation.is_accepted() {
        return Err(ApiError::Conflict(
            "Invitation has already been accepted".to_string(),
        ));
    }

    let deleted = Invitation::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
