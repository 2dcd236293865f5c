/// Property endpoints
///
/// Properties are the root of the ownership chain. Listing returns every
/// property the user can reach through either path: direct `user_id`
/// ownership or a role on a linked owner entity. Mutations require Edit
/// access; deletion requires Manage.
///
/// # Endpoints
///
/// - `GET    /v1/properties` - List reachable properties
/// - `POST   /v1/properties` - Create property (directly owned by creator)
/// - `GET    /v1/properties/:id` - Get property
/// - `PUT    /v1/properties/:id` - Update property
/// - `DELETE /v1/properties/:id` - Delete property (cascades)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use rentfolio_shared::{
    auth::{
        authorization::{require_property_access, AccessLevel},
        middleware::AuthContext,
    },
    models::property::{CreateProperty, Property, PropertyKind, UpdateProperty},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create property request
///
/// The creating user becomes the direct owner; owner-entity links are
/// managed separately through the owners endpoints.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePropertyRequest {
    /// Display name
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    /// Classification
    pub kind: Option<PropertyKind>,

    /// Street address
    #[validate(length(min = 1, max = 200, message = "Street must be 1-200 characters"))]
    pub street: String,

    /// City
    #[validate(length(min = 1, max = 100, message = "City must be 1-100 characters"))]
    pub city: String,

    /// State or province
    #[validate(length(min = 1, max = 100, message = "State must be 1-100 characters"))]
    pub state: String,

    /// Postal code
    #[validate(length(min = 1, max = 20, message = "Postal code must be 1-20 characters"))]
    pub postal_code: String,

    /// Purchase price in cents
    pub purchase_price_cents: Option<i64>,

    /// Purchase date
    pub purchased_on: Option<NaiveDate>,

    /// Free-form notes
    pub notes: Option<String>,
}

/// Property list response
#[derive(Debug, Serialize)]
pub struct ListPropertiesResponse {
    /// Properties reachable by the user
    pub properties: Vec<Property>,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether the record was deleted
    pub deleted: bool,
}

/// Lists every property the user can reach
pub async fn list_properties(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListPropertiesResponse>> {
    let properties = Property::list_for_user(&state.db, auth.user_id).await?;

    Ok(Json(ListPropertiesResponse { properties }))
}

/// Creates a property owned directly by the authenticated user
pub async fn create_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreatePropertyRequest>,
) -> ApiResult<Json<Property>> {
    req.validate().map_err(ApiError::from_validation)?;

    let property = Property::create(
        &state.db,
        CreateProperty {
            user_id: Some(auth.user_id),
            name: req.name,
            kind: req.kind.unwrap_or(PropertyKind::SingleFamily),
            street: req.street,
            city: req.city,
            state: req.state,
            postal_code: req.postal_code,
            purchase_price_cents: req.purchase_price_cents,
            purchased_on: req.purchased_on,
            notes: req.notes,
        },
    )
    .await?;

    Ok(Json(property))
}

/// Gets a property the user can view
pub async fn get_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Property>> {
    require_property_access(&state.db, auth.user_id, id, AccessLevel::View).await?;

    let property = Property::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    Ok(Json(property))
}

/// Updates a property
pub async fn update_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateProperty>,
) -> ApiResult<Json<Property>> {
    require_property_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    let property = Property::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    Ok(Json(property))
}

/// Deletes a property and everything hanging off it
pub async fn delete_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require_property_access(&state.db, auth.user_id, id, AccessLevel::Manage).await?;

    let deleted = Property::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
