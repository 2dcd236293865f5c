/// Renovation endpoints
///
/// A renovation project's detail view carries its line items and the sum
/// of their costs next to the budget.
///
/// # Endpoints
///
/// - `GET    /v1/properties/:id/renovations` - List renovations
/// - `POST   /v1/renovations` - Create renovation
/// - `GET    /v1/renovations/:id` - Get renovation with items and total
/// - `PUT    /v1/renovations/:id` - Update renovation (incl. status)
/// - `DELETE /v1/renovations/:id` - Delete renovation
/// - `POST   /v1/renovations/:id/items` - Add line item
/// - `PUT    /v1/renovation-items/:id` - Correct line item
/// - `DELETE /v1/renovation-items/:id` - Delete line item

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
        authorization::{
            require_property_access, require_renovation_access, require_renovation_item_access,
            AccessLevel,
        },
        middleware::AuthContext,
    },
    models::renovation::{
        CreateRenovation, CreateRenovationItem, Renovation, RenovationItem, UpdateRenovation,
        UpdateRenovationItem,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Renovation list response
#[derive(Debug, Serialize)]
pub struct ListRenovationsResponse {
    /// Renovation projects, newest first
    pub renovations: Vec<Renovation>,
}

/// Renovation detail with line items
#[derive(Debug, Serialize)]
pub struct RenovationDetailResponse {
    /// The renovation project
    #[serde(flatten)]
    pub renovation: Renovation,

    /// Line items, oldest first
    pub items: Vec<RenovationItem>,

    /// Sum of line item costs in cents
    pub total_cost_cents: i64,
}

/// Add line item request (renovation id comes from the path)
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    /// What was bought or done
    pub description: String,

    /// Cost in cents
    pub cost_cents: i64,

    /// Purchase date
    pub purchased_on: Option<NaiveDate>,

    /// Vendor name
    pub vendor: Option<String>,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether the record was deleted
    pub deleted: bool,
}

/// Lists renovation projects on a property
pub async fn list_renovations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(property_id): Path<Uuid>,
) -> ApiResult<Json<ListRenovationsResponse>> {
    require_property_access(&state.db, auth.user_id, property_id, AccessLevel::View).await?;

    let renovations = Renovation::list_by_property(&state.db, property_id).await?;

    Ok(Json(ListRenovationsResponse { renovations }))
}

/// Creates a renovation project
pub async fn create_renovation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(data): Json<CreateRenovation>,
) -> ApiResult<Json<Renovation>> {
    require_property_access(&state.db, auth.user_id, data.property_id, AccessLevel::Edit).await?;

    let renovation = Renovation::create(&state.db, data).await?;

    Ok(Json(renovation))
}

/// Gets a renovation with its line items and cost total
pub async fn get_renovation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RenovationDetailResponse>> {
    require_renovation_access(&state.db, auth.user_id, id, AccessLevel::View).await?;

    let renovation = Renovation::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Renovation not found".to_string()))?;

    let items = RenovationItem::list_by_renovation(&state.db, id).await?;
    let total_cost_cents = Renovation::total_cost_cents(&state.db, id).await?;

    Ok(Json(RenovationDetailResponse {
        renovation,
        items,
        total_cost_cents,
    }))
}

/// Updates a renovation project, including status transitions
pub async fn update_renovation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateRenovation>,
) -> ApiResult<Json<Renovation>> {
    require_renovation_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    let renovation = Renovation::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Renovation not found".to_string()))?;

    Ok(Json(renovation))
}

/// Deletes a renovation project and its line items
pub async fn delete_renovation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require_renovation_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    let deleted = Renovation::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { deleted }))
}

/// Adds a line item to a renovation
pub async fn create_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(renovation_id): Path<Uuid>,
    Json(req): Json<CreateItemRequest>,
) -> ApiResult<Json<RenovationItem>> {
    require_renovation_access(&state.db, auth.user_id, renovation_id, AccessLevel::Edit).await?;

    if req.cost_cents < 0 {
        return Err(ApiError::BadRequest("Cost cannot be negative".to_string()));
    }

    let item = RenovationItem::create(
        &state.db,
        CreateRenovationItem {
            renovation_id,
            description: req.description,
            cost_cents: req.cost_cents,
            purchased_on: req.purchased_on,
            vendor: req.vendor,
        },
    )
    .await?;

    Ok(Json(item))
}

/// Corrects a line item
pub async fn update_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateRenovationItem>,
) -> ApiResult<Json<RenovationItem>> {
    require_renovation_item_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    if matches!(data.cost_cents, Some(cost) if cost < 0) {
        return Err(ApiError::BadRequest("Cost cannot be negative".to_string()));
    }

    let item = RenovationItem::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Renovation item not found".to_string()))?;

    Ok(Json(item))
}

/// Deletes a line item
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require_renovation_item_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    let deleted = RenovationItem::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
