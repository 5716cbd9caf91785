mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, Set};
use serde_json::{Value, json};
use thrift_and_thrive::{
    dto::reports::ReportRangeQuery,
    entity::{Reports, cart_items::ActiveModel as CartActive},
    middleware::auth::{AdminUser, AuthUser},
    routes::create_app_router,
    services::{checkout_service, report_service},
    state::AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

const ADMIN_REQUIRED: &str = "/?notice=Admin%20access%20required.&level=error";

fn app(state: &AppState) -> Router {
    create_app_router().with_state(state.clone())
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn json_body(response: Response) -> anyhow::Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn admin_session(state: &AppState, admin: &AdminUser) -> anyhow::Result<String> {
    common::session_for(state, &AuthUser { user_id: admin.user_id })
}

fn checkout_request(cookie: Option<&str>, address_id: Uuid) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/confirm_purchase")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    Ok(builder.body(Body::from(json!({ "address_id": address_id }).to_string()))?)
}

#[tokio::test]
async fn anonymous_admin_requests_are_sent_home() -> anyhow::Result<()> {
    let test = common::offline()?;

    for (method, uri) in [
        ("GET", "/admin"),
        ("GET", "/admin/reports/generate?from_date=2024-01-01&to_date=2024-01-31"),
        ("POST", "/admin/reports/delete_all"),
        ("POST", "/admin/products/delete_all"),
    ] {
        let request = Request::builder().method(method).uri(uri).body(Body::empty())?;
        let response = app(&test.state).oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{method} {uri}");
        assert_eq!(location(&response), ADMIN_REQUIRED, "{method} {uri}");
    }
    Ok(())
}

#[tokio::test]
async fn anonymous_pages_redirect_and_checkout_answers_401() -> anyhow::Result<()> {
    let test = common::offline()?;

    let request = Request::builder().uri("/cart").body(Body::empty())?;
    let response = app(&test.state).oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/?notice=Please%20log%20in"));

    let response = app(&test.state)
        .oneshot(checkout_request(None, Uuid::new_v4())?)
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await?, json!({ "error": "User not logged in" }));
    Ok(())
}

#[tokio::test]
async fn forged_session_is_treated_as_anonymous() -> anyhow::Result<()> {
    let test = common::offline()?;

    let request = Request::builder()
        .uri("/admin")
        .header(header::COOKIE, "session=not-a-token")
        .body(Body::empty())?;
    let response = app(&test.state).oneshot(request).await?;
    assert_eq!(location(&response), ADMIN_REQUIRED);
    Ok(())
}

#[tokio::test]
async fn non_admins_are_sent_home_and_admins_get_the_dashboard() -> anyhow::Result<()> {
    let Some(test) = common::setup().await? else {
        return Ok(());
    };
    let state = &test.state;

    let user = common::register(state, "visitor").await?;
    let cookie = common::session_for(state, &user)?;
    let request = Request::builder()
        .uri("/admin")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())?;
    let response = app(state).oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), ADMIN_REQUIRED);

    let admin = common::admin(state).await?;
    let cookie = admin_session(state, &admin)?;
    let request = Request::builder()
        .uri("/admin")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())?;
    let response = app(state).oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["message"], "Admin dashboard");
    assert!(body["data"]["purchases"].is_array());
    Ok(())
}

#[tokio::test]
async fn failed_checkout_answers_500_and_rolls_back() -> anyhow::Result<()> {
    let Some(test) = common::setup().await? else {
        return Ok(());
    };
    let state = &test.state;

    let seller = common::register(state, "seller").await?;
    let buyer = common::register(state, "buyer").await?;
    let address = common::add_address(state, &buyer, "8 Ash St").await?;
    let product = common::list_product(state, &seller, "Linen Shirt", "11").await?;
    CartActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(buyer.user_id),
        product_id: Set(product),
        quantity: Set(0),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    let cookie = common::session_for(state, &buyer)?;

    let response = app(state)
        .oneshot(checkout_request(Some(&cookie), address)?)
        .await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await?;
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(checkout_service::list_purchase_events(state, &buyer).await?.is_empty());

    let response = app(state)
        .oneshot(checkout_request(Some(&cookie), Uuid::new_v4())?)
        .await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json_body(response).await?["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn successful_checkout_returns_the_event_id() -> anyhow::Result<()> {
    let Some(test) = common::setup().await? else {
        return Ok(());
    };
    let state = &test.state;

    let buyer = common::register(state, "buyer").await?;
    let address = common::add_address(state, &buyer, "6 Fir St").await?;
    let cookie = common::session_for(state, &buyer)?;

    let response = app(state)
        .oneshot(checkout_request(Some(&cookie), address)?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["status"], "success");
    let event_id: Uuid = body["purchase_event_id"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("missing event id"))?
        .parse()?;

    let request = Request::builder()
        .uri(format!("/purchase_details/{event_id}"))
        .body(Body::empty())?;
    let response = app(state).oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri(format!("/purchase_details/{}", Uuid::new_v4()))
        .body(Body::empty())?;
    let response = app(state).oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await?, json!({ "error": "Purchase event not found" }));
    Ok(())
}

#[tokio::test]
async fn delete_all_reports_tolerates_missing_files() -> anyhow::Result<()> {
    let Some(test) = common::setup().await? else {
        return Ok(());
    };
    let state = &test.state;
    let admin = common::admin(state).await?;

    let report =
        report_service::generate_report(state, &admin, ReportRangeQuery::default()).await?;
    std::fs::remove_file(&report.file_path)?;

    let cookie = admin_session(state, &admin)?;
    let request = Request::builder()
        .method("POST")
        .uri("/admin/reports/delete_all")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())?;
    let response = app(state).oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with(
        "/admin?notice=All%20reports%20have%20been%20successfully%20deleted."
    ));
    assert!(Reports::find_by_id(report.id).one(&state.orm).await?.is_none());
    Ok(())
}
