/// Integration tests for the Rentfolio API
///
/// These tests exercise the full request path end-to-end:
/// - Registration and login
/// - Property CRUD with ownership checks
/// - Owner entities, memberships, and invitations
/// - Financial report for an empty year
/// - Global search
///
/// They require PostgreSQL and are skipped when DATABASE_URL or
/// JWT_SECRET is not set.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use serde_json::{json, Value};
use tower::ServiceExt as _;

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", auth)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, auth: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", auth)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", auth)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    if !common::env_ready() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_register_and_login() {
    if !common::env_ready() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();

    let email = format!("register-{}@example.com", uuid::Uuid::new_v4());
    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": email,
                "password": "SecurePass123",
                "name": "New User"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());

    // Same credentials log in
    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": email,
                "password": "SecurePass123"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Wrong password does not
    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": email,
                "password": "WrongPass123"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_protected_routes_require_auth() {
    if !common::env_ready() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/properties")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_property_crud() {
    if !common::env_ready() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();
    let auth = ctx.auth_header();

    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/properties",
            &auth,
            json!({
                "name": "Maple Street Duplex",
                "kind": "multi_family",
                "street": "401 Maple St",
                "city": "Portland",
                "state": "OR",
                "postal_code": "97202"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(get(&format!("/v1/properties/{id}"), &auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["name"], "Maple Street Duplex");
    assert_eq!(fetched["kind"], "multi_family");

    let response = ctx
        .app
        .clone()
        .oneshot(get("/v1/properties", &auth))
        .await
        .unwrap();
    let list = body_json(response).await;
    assert!(list["properties"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["id"] == created["id"]));

    let response = ctx
        .app
        .clone()
        .oneshot(delete(&format!("/v1/properties/{id}"), &auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = body_json(response).await;
    assert_eq!(deleted["deleted"], true);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_property_not_visible_to_other_user() {
    if !common::env_ready() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();
    let property = common::create_test_property(&ctx, "Hidden House").await.unwrap();

    let (other, other_auth) = ctx.second_user().await.unwrap();

    // Unresolved ownership chain reads as 404, not 403
    let response = ctx
        .app
        .clone()
        .oneshot(get(&format!("/v1/properties/{}", property.id), &other_auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(other.id)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_unit_and_tenant_flow() {
    if !common::env_ready() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();
    let auth = ctx.auth_header();
    let property = common::create_test_property(&ctx, "Unit Flow").await.unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/units",
            &auth,
            json!({
                "property_id": property.id,
                "label": "2B",
                "bedrooms": 2,
                "bathrooms": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let unit = body_json(response).await;

    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/tenants",
            &auth,
            json!({
                "property_id": property.id,
                "unit_id": unit["id"],
                "name": "Avery Stone",
                "email": "avery@example.com"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tenant = body_json(response).await;
    assert_eq!(tenant["is_active"], true);

    // A unit from another property is rejected
    let other_property = common::create_test_property(&ctx, "Other").await.unwrap();
    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/units",
            &auth,
            json!({ "property_id": other_property.id, "label": "1A" }),
        ))
        .await
        .unwrap();
    let other_unit = body_json(response).await;

    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/tenants",
            &auth,
            json!({
                "property_id": property.id,
                "unit_id": other_unit["id"],
                "name": "Nobody"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_lease_and_payment_flow() {
    if !common::env_ready() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();
    let auth = ctx.auth_header();
    let property = common::create_test_property(&ctx, "Lease Flow").await.unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/tenants",
            &auth,
            json!({ "property_id": property.id, "name": "Rowan Park" }),
        ))
        .await
        .unwrap();
    let tenant = body_json(response).await;

    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/leases",
            &auth,
            json!({
                "tenant_id": tenant["id"],
                "rent_cents": 185000,
                "deposit_cents": 185000,
                "start_date": "2026-01-01"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let lease = body_json(response).await;

    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/payments",
            &auth,
            json!({
                "lease_id": lease["id"],
                "amount_cents": 185000,
                "paid_on": "2026-01-03",
                "method": "transfer"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Zero amounts are rejected
    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/payments",
            &auth,
            json!({
                "lease_id": lease["id"],
                "amount_cents": 0,
                "paid_on": "2026-01-03",
                "method": "transfer"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let lease_id = lease["id"].as_str().unwrap();
    let response = ctx
        .app
        .clone()
        .oneshot(get(&format!("/v1/leases/{lease_id}/payments"), &auth))
        .await
        .unwrap();
    let payments = body_json(response).await;
    assert_eq!(payments["payments"].as_array().unwrap().len(), 1);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_new_lease_deactivates_previous() {
    if !common::env_ready() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();
    let auth = ctx.auth_header();
    let property = common::create_test_property(&ctx, "Lease Handover").await.unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/tenants",
            &auth,
            json!({ "property_id": property.id, "name": "Casey Wells" }),
        ))
        .await
        .unwrap();
    let tenant = body_json(response).await;
    let tenant_id = tenant["id"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/leases",
            &auth,
            json!({
                "tenant_id": tenant["id"],
                "rent_cents": 160000,
                "start_date": "2025-01-01",
                "end_date": "2025-12-31"
            }),
        ))
        .await
        .unwrap();
    let first = body_json(response).await;
    assert_eq!(first["is_active"], true);

    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/leases",
            &auth,
            json!({
                "tenant_id": tenant["id"],
                "rent_cents": 172000,
                "start_date": "2026-01-01"
            }),
        ))
        .await
        .unwrap();
    let second = body_json(response).await;
    assert_eq!(second["is_active"], true);

    // The renewal retires the previous lease
    let response = ctx
        .app
        .clone()
        .oneshot(get(&format!("/v1/tenants/{tenant_id}/leases"), &auth))
        .await
        .unwrap();
    let leases = body_json(response).await;
    let leases = leases["leases"].as_array().unwrap();
    assert_eq!(leases.len(), 2);

    let refetched_first = leases.iter().find(|l| l["id"] == first["id"]).unwrap();
    let refetched_second = leases.iter().find(|l| l["id"] == second["id"]).unwrap();
    assert_eq!(refetched_first["is_active"], false);
    assert_eq!(refetched_second["is_active"], true);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_owner_membership_and_invitation_flow() {
    if !common::env_ready() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();
    let auth = ctx.auth_header();

    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/owners",
            &auth,
            json!({ "name": "Birch Holdings LLC", "kind": "llc" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let owner = body_json(response).await;
    let owner_id = owner["id"].as_str().unwrap().to_string();

    // Creator is the sole admin
    let response = ctx
        .app
        .clone()
        .oneshot(get(&format!("/v1/owners/{owner_id}/members"), &auth))
        .await
        .unwrap();
    let members = body_json(response).await;
    assert_eq!(members["members"].as_array().unwrap().len(), 1);
    assert_eq!(members["members"][0]["role"], "admin");

    // Sole admin cannot remove themselves
    let response = ctx
        .app
        .clone()
        .oneshot(delete(
            &format!("/v1/owners/{owner_id}/members/{}", ctx.user.id),
            &auth,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Invite a second user as editor
    let response = ctx
        .app
        .clone()
        .oneshot(post(
            &format!("/v1/owners/{owner_id}/invitations"),
            &auth,
            json!({ "email": "invitee@example.com", "role": "editor" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let invitation = body_json(response).await;
    let token = invitation["token"].as_str().unwrap().to_string();
    assert!(token.starts_with("rfinv_"));

    let (invitee, invitee_auth) = ctx.second_user().await.unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/invitations/accept",
            &invitee_auth,
            json!({ "token": token }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let membership = body_json(response).await;
    assert_eq!(membership["role"], "editor");

    // Tokens are single-use
    let response = ctx
        .app
        .clone()
        .oneshot(post(
            "/v1/invitations/accept",
            &invitee_auth,
            json!({ "token": token }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Editors cannot manage invitations
    let response = ctx
        .app
        .clone()
        .oneshot(get(&format!("/v1/owners/{owner_id}/invitations"), &invitee_auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    sqlx::query("DELETE FROM owners WHERE id = $1::uuid")
        .bind(&owner_id)
        .execute(&ctx.db)
        .await
        .unwrap();
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(invitee.id)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_financial_report_empty_year() {
    if !common::env_ready() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();
    let auth = ctx.auth_header();
    let property = common::create_test_property(&ctx, "Report House").await.unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(get(
            &format!("/v1/reports/financial?property_id={}&year=2019", property.id),
            &auth,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report = body_json(response).await;
    assert_eq!(report["months"].as_array().unwrap().len(), 12);
    assert_eq!(report["total_income_cents"], 0);
    assert_eq!(report["net_cents"], 0);

    // CSV variant comes back as text/csv with a header row
    let response = ctx
        .app
        .clone()
        .oneshot(get(
            &format!(
                "/v1/reports/financial.csv?property_id={}&year=2019",
                property.id
            ),
            &auth,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/csv"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("month,income,expenses,net"));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_search() {
    if !common::env_ready() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();
    let auth = ctx.auth_header();
    let property = common::create_test_property(&ctx, "Sunset Fourplex").await.unwrap();

    // Blank query returns quick actions only
    let response = ctx
        .app
        .clone()
        .oneshot(get("/v1/search?q=", &auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["results"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["result_type"] == "action"));

    // Named property matches and outranks nothing below it
    let response = ctx
        .app
        .clone()
        .oneshot(get("/v1/search?q=Sunset", &auth))
        .await
        .unwrap();
    let body = body_json(response).await;
    let results = body["results"].as_array().unwrap();
    assert!(results
        .iter()
        .any(|r| r["result_type"] == "property"
            && r["id"] == json!(property.id.to_string())));

    ctx.cleanup().await.unwrap();
}
