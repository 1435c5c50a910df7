use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use time::{Duration, OffsetDateTime};

use staybook::{app::build_app, state::AppState};

fn app() -> Router {
    build_app(AppState::fake())
}

async fn call(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(AUTHORIZATION, t);
    }
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let body = match body {
        Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
        None => Body::empty(),
    };
    let resp = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn signup_and_login(router: &Router, email: &str, password: &str) -> String {
    let (status, _) = call(
        router,
        "POST",
        "/signup",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(
        router,
        "POST",
        "/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["auth"], true);
    body["token"].as_str().unwrap().to_string()
}

fn booking_body() -> Value {
    json!({ "hotel_id": 1, "start_date": "2025-01-01", "end_date": "2025-01-03" })
}

#[tokio::test]
async fn full_booking_lifecycle() {
    let router = app();
    let token = signup_and_login(&router, "a@x.com", "pw").await;
    let other = signup_and_login(&router, "b@x.com", "pw2").await;

    let (status, profile) = call(&router, "GET", "/user/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let user_id = profile["user_id"].as_i64().unwrap();

    let (status, created) =
        call(&router, "POST", "/bookings", Some(&token), Some(booking_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    let booking = &created["booking"];
    assert_eq!(booking["user_id"].as_i64(), Some(user_id));
    assert_eq!(booking["hotel_id"], 1);
    assert_eq!(booking["start_date"], "2025-01-01");
    assert_eq!(booking["end_date"], "2025-01-03");
    let booking_id = booking["booking_id"].as_i64().unwrap();

    let (status, listed) = call(&router, "GET", "/bookings", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let bookings = listed["bookings"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["booking_id"].as_i64(), Some(booking_id));

    let uri = format!("/bookings/{booking_id}");
    let (status, body) = call(&router, "DELETE", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Booking not found");

    let (status, _) = call(&router, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, listed) = call(&router, "GET", "/bookings", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed["bookings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn foreign_update_looks_like_missing_booking() {
    let router = app();
    let owner = signup_and_login(&router, "a@x.com", "pw").await;
    let other = signup_and_login(&router, "b@x.com", "pw").await;

    let (_, created) =
        call(&router, "POST", "/bookings", Some(&owner), Some(booking_body())).await;
    let uri = format!("/bookings/{}", created["booking"]["booking_id"]);

    let change = json!({ "hotel_id": 1, "start_date": "2025-02-01", "end_date": "2025-02-02" });
    let (foreign_status, foreign_body) =
        call(&router, "PUT", &uri, Some(&other), Some(change.clone())).await;
    let (missing_status, missing_body) =
        call(&router, "PUT", "/bookings/999999", Some(&other), Some(change.clone())).await;
    assert_eq!(foreign_status, StatusCode::NOT_FOUND);
    assert_eq!(foreign_status, missing_status);
    assert_eq!(foreign_body, missing_body);

    let (status, updated) = call(&router, "PUT", &uri, Some(&owner), Some(change)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["booking"]["start_date"], "2025-02-01");
}

#[tokio::test]
async fn protected_routes_require_token() {
    let router = app();
    for (method, uri) in [
        ("GET", "/bookings"),
        ("POST", "/bookings"),
        ("PUT", "/bookings/1"),
        ("DELETE", "/bookings/1"),
        ("GET", "/hotels/1"),
        ("PUT", "/userUpdate"),
        ("GET", "/user/profile"),
    ] {
        let (status, body) = call(&router, method, uri, None, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(body["error"], "No token provided");

        let (status, body) = call(&router, method, uri, Some("not-a-token"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(body["error"], "Failed to authenticate token");
    }
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let state = AppState::fake();
    let issued = OffsetDateTime::now_utc() - Duration::days(2);
    let expired = state.keys.issue_at(1, "a@x.com", issued).unwrap();
    let fresh = state.keys.issue(1, "a@x.com").unwrap();
    let router = build_app(state);

    let (status, body) = call(&router, "GET", "/bookings", Some(&expired), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Failed to authenticate token");

    let (status, _) = call(&router, "GET", "/bookings", Some(&fresh), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn owner_update_to_unknown_hotel_is_not_found() {
    let router = app();
    let token = signup_and_login(&router, "a@x.com", "pw").await;
    let (_, created) =
        call(&router, "POST", "/bookings", Some(&token), Some(booking_body())).await;
    let uri = format!("/bookings/{}", created["booking"]["booking_id"]);

    let change = json!({ "hotel_id": 77, "start_date": "2025-02-01", "end_date": "2025-02-02" });
    let (status, body) = call(&router, "PUT", &uri, Some(&token), Some(change)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Hotel not found");

    let (_, listed) = call(&router, "GET", "/bookings", Some(&token), None).await;
    assert_eq!(listed["bookings"][0]["hotel_id"], 1);
    assert_eq!(listed["bookings"][0]["start_date"], "2025-01-01");
}

#[tokio::test]
async fn signup_validation_and_conflict() {
    let router = app();
    let (status, body) = call(
        &router,
        "POST",
        "/signup",
        None,
        Some(json!({ "email": "a@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email and password are required.");

    let creds = json!({ "email": "a@x.com", "password": "pw" });
    let (status, body) = call(&router, "POST", "/signup", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user"].get("password").is_none());

    let (status, body) = call(&router, "POST", "/signup", None, Some(creds)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email is already taken");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let router = app();
    signup_and_login(&router, "a@x.com", "pw").await;

    let (s1, b1) = call(
        &router,
        "POST",
        "/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "wrong" })),
    )
    .await;
    let (s2, b2) = call(
        &router,
        "POST",
        "/login",
        None,
        Some(json!({ "email": "nobody@x.com", "password": "pw" })),
    )
    .await;
    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s1, s2);
    assert_eq!(b1, b2);
}

#[tokio::test]
async fn hotels_listing_is_public_but_lookup_is_not() {
    let router = app();
    let (status, body) = call(&router, "GET", "/hotels", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hotels"][0]["hotel_id"], 1);

    let token = signup_and_login(&router, "a@x.com", "pw").await;
    let (status, hotel) = call(&router, "GET", "/hotels/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hotel["name"], "Harbour View");

    let (status, _) = call(&router, "GET", "/hotels/42", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_input_is_validated() {
    let router = app();
    let token = signup_and_login(&router, "a@x.com", "pw").await;

    let (status, body) = call(
        &router,
        "POST",
        "/bookings",
        Some(&token),
        Some(json!({ "start_date": "2025-01-01", "end_date": "2025-01-03" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "hotel_id is required");

    let (status, body) = call(
        &router,
        "POST",
        "/bookings",
        Some(&token),
        Some(json!({ "hotel_id": 77, "start_date": "2025-01-01", "end_date": "2025-01-03" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Hotel not found");

    let (status, _) = call(&router, "DELETE", "/bookings/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_update_changes_login_credentials() {
    let router = app();
    let token = signup_and_login(&router, "a@x.com", "pw").await;

    let (status, body) = call(
        &router,
        "PUT",
        "/userUpdate",
        Some(&token),
        Some(json!({ "email": "new@x.com", "password": "pw2", "phone_number": "555-0100" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "new@x.com");
    assert_eq!(body["user"]["phone_number"], "555-0100");
    assert!(body["user"].get("password").is_none());

    let (status, _) = call(
        &router,
        "POST",
        "/login",
        None,
        Some(json!({ "email": "new@x.com", "password": "pw2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        &router,
        "POST",
        "/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let router = app();
    let resp = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
