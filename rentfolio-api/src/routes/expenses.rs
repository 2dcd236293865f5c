/// Expense endpoints
///
/// # Endpoints
///
/// - `GET    /v1/properties/:id/expenses?category=&year=` - List expenses
/// - `POST   /v1/expenses` - Record expense
/// - `PUT    /v1/expenses/:id` - Correct expense
/// - `DELETE /v1/expenses/:id` - Delete expense

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use rentfolio_shared::{
    auth::{
        authorization::{require_expense_access, require_property_access, AccessLevel},
        middleware::AuthContext,
    },
    models::expense::{CreateExpense, Expense, ExpenseCategory, UpdateExpense},
    reports::year_bounds,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Optional expense list filters
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseFilter {
    /// Restrict to one category
    pub category: Option<ExpenseCategory>,

    /// Restrict to one calendar year
    pub year: Option<i32>,
}

/// Expense list response
#[derive(Debug, Serialize)]
pub struct ListExpensesResponse {
    /// Expenses matching the filters
    pub expenses: Vec<Expense>,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether the record was deleted
    pub deleted: bool,
}

/// Lists expenses on a property with optional category and year filters
pub async fn list_expenses(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(property_id): Path<Uuid>,
    Query(filter): Query<ExpenseFilter>,
) -> ApiResult<Json<ListExpensesResponse>> {
    require_property_access(&state.db, auth.user_id, property_id, AccessLevel::View).await?;

    let mut expenses = match filter.year {
        Some(year) => {
            let (from, to) = year_bounds(year);
            Expense::list_for_property_between(&state.db, property_id, from, to).await?
        }
        None => Expense::list_by_property(&state.db, property_id).await?,
    };

    if let Some(category) = filter.category {
        expenses.retain(|e| e.category == category);
    }

    Ok(Json(ListExpensesResponse { expenses }))
}

/// Records an expense against a property
pub async fn create_expense(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(data): Json<CreateExpense>,
) -> ApiResult<Json<Expense>> {
    require_property_access(&state.db, auth.user_id, data.property_id, AccessLevel::Edit).await?;

    if data.amount_cents <= 0 {
        return Err(ApiError::BadRequest(
            "Expense amount must be positive".to_string(),
        ));
    }

    let expense = Expense::create(&state.db, data).await?;

    Ok(Json(expense))
}

/// Corrects an expense record
pub async fn update_expense(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateExpense>,
) -> ApiResult<Json<Expense>> {
    require_expense_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    if matches!(data.amount_cents, Some(amount) if amount <= 0) {
        return Err(ApiError::BadRequest(
            "Expense amount must be positive".to_string(),
        ));
    }

    let expense = Expense::update(&state.db, id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Expense not found".to_string()))?;

    Ok(Json(expense))
}

/// Deletes an expense record
pub async fn delete_expense(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require_expense_access(&state.db, auth.user_id, id, AccessLevel::Edit).await?;

    let deleted = Expense::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
