/// Financial report endpoints
///
/// One calendar year of income and expenses for one property, bucketed
/// by month, with a category breakdown and a separate renovation total.
/// Available as JSON or as a CSV download.
///
/// # Endpoints
///
/// - `GET /v1/reports/financial?property_id=&year=` - Report as JSON
/// - `GET /v1/reports/financial.csv?property_id=&year=` - Report as CSV

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    http::header,
    Extension, Json,
};
use rentfolio_shared::{
    auth::{
        authorization::{require_property_access, AccessLevel},
        middleware::AuthContext,
    },
    models::{expense::Expense, payment::Payment, renovation::RenovationItem},
    reports::{build_financial_report, year_bounds, FinancialReport},
};
use serde::Deserialize;
use uuid::Uuid;

/// Report query parameters
#[derive(Debug, Deserialize)]
pub struct ReportParams {
    /// Property to report on
    pub property_id: Uuid,

    /// Calendar year
    pub year: i32,
}

async fn assemble_report(
    state: &AppState,
    auth: &AuthContext,
    params: &ReportParams,
) -> ApiResult<FinancialReport> {
    require_property_access(&state.db, auth.user_id, params.property_id, AccessLevel::View)
        .await?;

    let (from, to) = year_bounds(params.year);

    let (payments, expenses, items) = tokio::try_join!(
        Payment::list_for_property_between(&state.db, params.property_id, from, to),
        Expense::list_for_property_between(&state.db, params.property_id, from, to),
        RenovationItem::list_for_property_between(&state.db, params.property_id, from, to),
    )?;

    Ok(build_financial_report(
        params.property_id,
        params.year,
        &payments,
        &expenses,
        &items,
    ))
}

/// Returns the financial report for a property-year as JSON
pub async fn financial_report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<ReportParams>,
) -> ApiResult<Json<FinancialReport>> {
    let report = assemble_report(&state, &auth, &params).await?;

    Ok(Json(report))
}

/// Returns the financial report for a property-year as a CSV download
pub async fn financial_report_csv(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<ReportParams>,
) -> ApiResult<([(header::HeaderName, String); 2], String)> {
    let report = assemble_report(&state, &auth, &params).await?;

    let filename = format!(
        "attachment; filename=\"financial-{}-{}.csv\"",
        params.property_id, params.year
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        report.to_csv(),
    ))
}
