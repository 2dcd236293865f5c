/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use rentfolio_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = rentfolio_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use rentfolio_shared::auth::{jwt, middleware::AuthContext};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// └── /v1/                           # API v1 (versioned)
///     ├── /auth/                     # register, login, refresh (public)
///     ├── /properties/               # property CRUD + child listings
///     ├── /units/                    # unit CRUD
///     ├── /tenants/                  # tenant CRUD + lease listing
///     ├── /leases/                   # lease CRUD + payment listing
///     ├── /payments/                 # payment create/correct/delete
///     ├── /expenses/                 # expense create/correct/delete
///     ├── /renovations/              # renovation CRUD + line items
///     ├── /renovation-items/         # line item correct/delete
///     ├── /parking-permits/          # permit lifecycle + activity log
///     ├── /owners/                   # owner entities, members, links, invites
///     ├── /invitations/              # invitation accept/revoke
///     ├── /reports/                  # financial report (JSON + CSV)
///     └── /search                    # global search
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Authentication (per-router, everything except /health and /v1/auth)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let property_routes = Router::new()
        .route(
            "/",
            get(routes::properties::list_properties).post(routes::properties::create_property),
        )
        .route(
            "/:id",
            get(routes::properties::get_property)
                .put(routes::properties::update_property)
                .delete(routes::properties::delete_property),
        )
        .route("/:id/units", get(routes::units::list_units))
        .route("/:id/tenants", get(routes::tenants::list_tenants))
        .route("/:id/expenses", get(routes::expenses::list_expenses))
        .route("/:id/renovations", get(routes::renovations::list_renovations))
        .route("/:id/parking-permits", get(routes::parking::list_permits));

    let unit_routes = Router::new()
        .route("/", post(routes::units::create_unit))
        .route(
            "/:id",
            get(routes::units::get_unit)
                .put(routes::units::update_unit)
                .delete(routes::units::delete_unit),
        );

    let tenant_routes = Router::new()
        .route("/", post(routes::tenants::create_tenant))
        .route(
            "/:id",
            get(routes::tenants::get_tenant)
                .put(routes::tenants::update_tenant)
                .delete(routes::tenants::delete_tenant),
        )
        .route("/:id/leases", get(routes::leases::list_leases));

    let lease_routes = Router::new()
        .route("/", post(routes::leases::create_lease))
        .route(
            "/:id",
            get(routes::leases::get_lease)
                .put(routes::leases::update_lease)
                .delete(routes::leases::delete_lease),
        )
        .route("/:id/payments", get(routes::payments::list_payments));

    let payment_routes = Router::new()
        .route("/", post(routes::payments::create_payment))
        .route(
            "/:id",
            put(routes::payments::update_payment).delete(routes::payments::delete_payment),
        );

    let expense_routes = Router::new()
        .route("/", post(routes::expenses::create_expense))
        .route(
            "/:id",
            put(routes::expenses::update_expense).delete(routes::expenses::delete_expense),
        );

    let renovation_routes = Router::new()
        .route("/", post(routes::renovations::create_renovation))
        .route(
            "/:id",
            get(routes::renovations::get_renovation)
                .put(routes::renovations::update_renovation)
                .delete(routes::renovations::delete_renovation),
        )
        .route("/:id/items", post(routes::renovations::create_item));

    let renovation_item_routes = Router::new().route(
        "/:id",
        put(routes::renovations::update_item).delete(routes::renovations::delete_item),
    );

    let parking_routes = Router::new()
        .route("/", post(routes::parking::create_permit))
        .route("/:id", axum::routing::delete(routes::parking::delete_permit))
        .route(
            "/:id/activity",
            get(routes::parking::list_activity).post(routes::parking::create_activity),
        );

    let owner_routes = Router::new()
        .route(
            "/",
            get(routes::owners::list_owners).post(routes::owners::create_owner),
        )
        .route(
            "/:id",
            get(routes::owners::get_owner)
                .put(routes::owners::update_owner)
                .delete(routes::owners::delete_owner),
        )
        .route("/:id/members", get(routes::owners::list_members))
        .route(
            "/:id/members/:user_id",
            put(routes::owners::update_member_role).delete(routes::owners::remove_member),
        )
        .route("/:id/properties", post(routes::owners::link_property))
        .route(
            "/:id/properties/:property_id",
            put(routes::owners::update_property_link)
                .delete(routes::owners::unlink_property),
        )
        .route(
            "/:id/invitations",
            get(routes::invitations::list_invitations)
                .post(routes::invitations::create_invitation),
        );

    let invitation_routes = Router::new()
        .route("/accept", post(routes::invitations::accept_invitation))
        .route(
            "/:id",
            axum::routing::delete(routes::invitations::revoke_invitation),
        );

    let report_routes = Router::new()
        .route("/financial", get(routes::reports::financial_report))
        .route("/financial.csv", get(routes::reports::financial_report_csv));

    let search_routes = Router::new().route("/", get(routes::search::search));

    // Everything below /v1 except /auth requires a valid JWT
    let protected_routes = Router::new()
        .nest("/properties", property_routes)
        .nest("/units", unit_routes)
        .nest("/tenants", tenant_routes)
        .nest("/leases", lease_routes)
        .nest("/payments", payment_routes)
        .nest("/expenses", expense_routes)
        .nest("/renovations", renovation_routes)
        .nest("/renovation-items", renovation_item_routes)
        .nest("/parking-permits", parking_routes)
        .nest("/owners", owner_routes)
        .nest("/invitations", invitation_routes)
        .nest("/reports", report_routes)
        .nest("/search", search_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the JWT from the Authorization header, then
/// injects AuthContext into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_jwt(claims.sub);

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
