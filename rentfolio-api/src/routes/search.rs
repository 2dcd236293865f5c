/// Global search endpoint
///
/// One query box over everything: a static quick-action table (pages the
/// user can jump to) plus case-insensitive matches over properties,
/// units, tenants, and leases, all scoped to what the user can see. The
/// entity queries fan out concurrently and the merged result list follows
/// a fixed type priority.
///
/// # Endpoints
///
/// - `GET /v1/search?q=` - Search everything the user can access

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use rentfolio_shared::auth::middleware::AuthContext;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Cap on merged results, quick actions included
const MAX_RESULTS: usize = 20;

/// Per-entity row cap for the database queries
const PER_TYPE_LIMIT: i64 = 10;

/// Search query parameters
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text query
    #[serde(default)]
    pub q: String,
}

/// What kind of record a search result points at
///
/// Variant order is the merge priority: actions first, then properties,
/// units, tenants, leases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchResultType {
    Action,
    Property,
    Unit,
    Tenant,
    Lease,
}

/// One search hit
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// What the hit is
    pub result_type: SearchResultType,

    /// Record ID (None for quick actions)
    pub id: Option<Uuid>,

    /// Display label
    pub label: String,

    /// Secondary line (address, property name, etc.)
    pub detail: Option<String>,

    /// Client route for the hit
    pub path: String,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Hits in priority order, capped
    pub results: Vec<SearchResult>,
}

/// A page the search box can jump to directly
struct QuickAction {
    label: &'static str,
    keywords: &'static [&'static str],
    path: &'static str,
}

const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        label: "Properties",
        keywords: &["property", "properties", "portfolio", "buildings"],
        path: "/properties",
    },
    QuickAction {
        label: "Tenants",
        keywords: &["tenant", "tenants", "renters"],
        path: "/tenants",
    },
    QuickAction {
        label: "Payments",
        keywords: &["payment", "payments", "rent", "income"],
        path: "/payments",
    },
    QuickAction {
        label: "Expenses",
        keywords: &["expense", "expenses", "spending", "costs"],
        path: "/expenses",
    },
    QuickAction {
        label: "Renovations",
        keywords: &["renovation", "renovations", "remodel", "repairs"],
        path: "/renovations",
    },
    QuickAction {
        label: "Parking",
        keywords: &["parking", "permit", "permits", "vehicle"],
        path: "/parking",
    },
    QuickAction {
        label: "Owners",
        keywords: &["owner", "owners", "llc", "entity", "members"],
        path: "/owners",
    },
    QuickAction {
        label: "Financial report",
        keywords: &["report", "reports", "financial", "csv", "summary"],
        path: "/reports/financial",
    },
];

/// Searches quick actions and all accessible records
pub async fn search(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let query = params.q.trim();

    // Blank query: quick actions only, no database round trips
    if query.is_empty() {
        let results = QUICK_ACTIONS
            .iter()
            .map(quick_action_result)
            .take(MAX_RESULTS)
            .collect();
        return Ok(Json(SearchResponse { results }));
    }

    let mut results: Vec<SearchResult> = match_quick_actions(query);

    let pattern = like_pattern(query);
    let (properties, units, tenants, leases) = tokio::try_join!(
        search_properties(&state.db, auth.user_id, &pattern),
        search_units(&state.db, auth.user_id, &pattern),
        search_tenants(&state.db, auth.user_id, &pattern),
        search_leases(&state.db, auth.user_id, &pattern),
    )?;

    results.extend(properties);
    results.extend(units);
    results.extend(tenants);
    results.extend(leases);

    results.sort_by_key(|r| r.result_type);
    results.truncate(MAX_RESULTS);

    Ok(Json(SearchResponse { results }))
}

fn quick_action_result(action: &QuickAction) -> SearchResult {
    SearchResult {
        result_type: SearchResultType::Action,
        id: None,
        label: action.label.to_string(),
        detail: None,
        path: action.path.to_string(),
    }
}

/// Matches the query against quick-action labels and keywords
fn match_quick_actions(query: &str) -> Vec<SearchResult> {
    let needle = query.to_lowercase();

    QUICK_ACTIONS
        .iter()
        .filter(|action| {
            action.label.to_lowercase().contains(&needle)
                || action.keywords.iter().any(|kw| kw.contains(&needle))
        })
        .map(quick_action_result)
        .collect()
}

/// Builds an ILIKE pattern with `%`, `_`, and `\` escaped
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

async fn search_properties(
    pool: &PgPool,
    user_id: Uuid,
    pattern: &str,
) -> Result<Vec<SearchResult>, sqlx::Error> {
    let rows: Vec<(Uuid, String, String, String)> = sqlx::query_as(
        r#"
        SELECT DISTINCT p.id, p.name, p.city, p.state
        FROM properties p
        LEFT JOIN property_owners po ON po.property_id = p.id
        LEFT JOIN user_owners uo ON uo.owner_id = po.owner_id
        WHERE (p.user_id = $1 OR uo.user_id = $1)
          AND (p.name ILIKE $2 OR p.street ILIKE $2 OR p.city ILIKE $2)
        ORDER BY p.name ASC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(pattern)
    .bind(PER_TYPE_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, city, state)| SearchResult {
            result_type: SearchResultType::Property,
            id: Some(id),
            label: name,
            detail: Some(format!("{city}, {state}")),
            path: format!("/properties/{id}"),
        })
        .collect())
}

async fn search_units(
    pool: &PgPool,
    user_id: Uuid,
    pattern: &str,
) -> Result<Vec<SearchResult>, sqlx::Error> {
    let rows: Vec<(Uuid, String, String)> = sqlx::query_as(
        r#"
        SELECT DISTINCT u.id, u.label, p.name
        FROM units u
        JOIN properties p ON p.id = u.property_id
        LEFT JOIN property_owners po ON po.property_id = p.id
        LEFT JOIN user_owners uo ON uo.owner_id = po.owner_id
        WHERE (p.user_id = $1 OR uo.user_id = $1)
          AND u.label ILIKE $2
        ORDER BY u.label ASC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(pattern)
    .bind(PER_TYPE_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, label, property)| SearchResult {
            result_type: SearchResultType::Unit,
            id: Some(id),
            label,
            detail: Some(property),
            path: format!("/units/{id}"),
        })
        .collect())
}

async fn search_tenants(
    pool: &PgPool,
    user_id: Uuid,
    pattern: &str,
) -> Result<Vec<SearchResult>, sqlx::Error> {
    let rows: Vec<(Uuid, String, Option<String>)> = sqlx::query_as(
        r#"
        SELECT DISTINCT t.id, t.name, t.email
        FROM tenants t
        JOIN properties p ON p.id = t.property_id
        LEFT JOIN property_owners po ON po.property_id = p.id
        LEFT JOIN user_owners uo ON uo.owner_id = po.owner_id
        WHERE (p.user_id = $1 OR uo.user_id = $1)
          AND (t.name ILIKE $2 OR t.email ILIKE $2)
        ORDER BY t.name ASC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(pattern)
    .bind(PER_TYPE_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, email)| SearchResult {
            result_type: SearchResultType::Tenant,
            id: Some(id),
            label: name,
            detail: email,
            path: format!("/tenants/{id}"),
        })
        .collect())
}

/// Leases carry no text of their own, so they match through the tenant's
/// name.
async fn search_leases(
    pool: &PgPool,
    user_id: Uuid,
    pattern: &str,
) -> Result<Vec<SearchResult>, sqlx::Error> {
    let rows: Vec<(Uuid, String, i64)> = sqlx::query_as(
        r#"
        SELECT DISTINCT l.id, t.name, l.rent_cents
        FROM leases l
        JOIN tenants t ON t.id = l.tenant_id
        JOIN properties p ON p.id = t.property_id
        LEFT JOIN property_owners po ON po.property_id = p.id
        LEFT JOIN user_owners uo ON uo.owner_id = po.owner_id
        WHERE (p.user_id = $1 OR uo.user_id = $1)
          AND t.name ILIKE $2
        ORDER BY t.name ASC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(pattern)
    .bind(PER_TYPE_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, tenant, rent_cents)| SearchResult {
            result_type: SearchResultType::Lease,
            id: Some(id),
            label: format!("Lease for {tenant}"),
            detail: Some(format!("${}.{:02}/mo", rent_cents / 100, rent_cents % 100)),
            path: format!("/leases/{id}"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_actions_match_keywords() {
        let results = match_quick_actions("rent");
        assert!(results.iter().any(|r| r.label == "Payments"));

        let results = match_quick_actions("permit");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "/parking");
    }

    #[test]
    fn test_quick_actions_match_label_case_insensitive() {
        let results = match_quick_actions("OWN");
        assert!(results.iter().any(|r| r.label == "Owners"));
    }

    #[test]
    fn test_quick_actions_no_match() {
        assert!(match_quick_actions("zzzzz").is_empty());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("oak"), "%oak%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c\\d"), "%c\\\\d%");
    }

    #[test]
    fn test_result_type_priority_ordering() {
        let mut types = vec![
            SearchResultType::Lease,
            SearchResultType::Action,
            SearchResultType::Tenant,
            SearchResultType::Property,
            SearchResultType::Unit,
        ];
        types.sort();
        assert_eq!(
            types,
            vec![
                SearchResultType::Action,
                SearchResultType::Property,
                SearchResultType::Unit,
                SearchResultType::Tenant,
                SearchResultType::Lease,
            ]
        );
    }

    #[test]
    fn test_merged_results_capped() {
        let mut results: Vec<SearchResult> = (0..30)
            .map(|i| SearchResult {
                result_type: SearchResultType::Property,
                id: Some(Uuid::new_v4()),
                label: format!("Property {i}"),
                detail: None,
                path: format!("/properties/{i}"),
            })
            .collect();

        results.sort_by_key(|r| r.result_type);
        results.truncate(MAX_RESULTS);
        assert_eq!(results.len(), MAX_RESULTS);
    }
}
