//! HTTP contract tests against the in-memory store
use std::time::{Duration, Instant};

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::{json, Value};

use ping_service::config::{Config, RateLimitConfig, StorageBackend};
use ping_service::store::Stores;
use ping_service::{configure, AppState};

fn test_config(delay: Duration) -> Config {
    Config {
        storage: StorageBackend::Memory,
        ping_delay: delay,
        rate_limit: RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
        },
        top_users: 2,
        ..Config::default()
    }
}

/// Log in and evaluate to the session cookie.
macro_rules! login {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "username": $username, "password": "123456" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        resp.response()
            .cookies()
            .find(|c| c.name() == "ping_session")
            .map(|c| c.into_owned())
            .unwrap()
    }};
}

fn get(uri: &str, cookie: &Cookie<'static>) -> test::TestRequest {
    test::TestRequest::get().uri(uri).cookie(cookie.clone())
}

#[actix_web::test]
async fn login_validation() {
    let state = AppState::new(test_config(Duration::ZERO), Stores::memory());
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, state))).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": "alice", "password": "123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid credentials");

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": "", "password": "" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"username\":")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": "test_user", "password": "123456" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Login successful");
}

#[actix_web::test]
async fn protected_routes_require_session() {
    let state = AppState::new(test_config(Duration::ZERO), Stores::memory());
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, state))).await;

    for uri in ["/ping", "/count", "/top"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Unauthorized");
    }

    let bogus = Cookie::new("ping_session", "does-not-exist");
    let resp = test::call_service(&app, get("/ping", &bogus).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn third_ping_in_window_is_rate_limited() {
    let state = AppState::new(test_config(Duration::ZERO), Stores::memory());
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, state))).await;

    let cookie = login!(app, "tester");

    // GIVEN: a limit of two pings per window
    for _ in 0..2 {
        let body: Value = test::call_and_read_body_json(&app, get("/ping", &cookie).to_request()).await;
        assert_eq!(body["message"], "pong");
    }

    // WHEN: a third ping arrives in the same window
    let resp = test::call_service(&app, get("/ping", &cookie).to_request()).await;

    // THEN: 429 and the counter is unchanged
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Rate limit exceeded");

    let body: Value = test::call_and_read_body_json(&app, get("/count", &cookie).to_request()).await;
    assert_eq!(body, json!({ "ping_count": 2, "unique_users": 1 }));

    // Another user has their own budget
    let other = login!(app, "test_other");
    let resp = test::call_service(&app, get("/ping", &other).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn leaderboard_orders_by_count() {
    let mut config = test_config(Duration::ZERO);
    config.rate_limit.max_requests = 10;
    let state = AppState::new(config, Stores::memory());
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, state))).await;

    let pings = [("test_a", 1), ("test_b", 3), ("test_c", 2)];
    let mut cookies = Vec::new();
    for (name, n) in pings {
        let cookie = login!(app, name);
        for _ in 0..n {
            let resp = test::call_service(&app, get("/ping", &cookie).to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
        cookies.push(cookie);
    }

    let body: Value = test::call_and_read_body_json(&app, get("/top", &cookies[0]).to_request()).await;
    assert_eq!(
        body,
        json!([
            { "username": "test_b", "count": 3 },
            { "username": "test_c", "count": 2 },
        ])
    );

    let body: Value = test::call_and_read_body_json(&app, get("/count", &cookies[0]).to_request()).await;
    assert_eq!(body["ping_count"], 6);
    assert_eq!(body["unique_users"], 3);
}

#[actix_web::test]
async fn concurrent_pings_are_serialized() {
    let delay = Duration::from_millis(100);
    let state = AppState::new(test_config(delay), Stores::memory());
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, state))).await;

    let a = login!(app, "test_a");
    let b = login!(app, "test_b");

    let started = Instant::now();
    let (ra, rb) = futures_util::future::join(
        test::call_service(&app, get("/ping", &a).to_request()),
        test::call_service(&app, get("/ping", &b).to_request()),
    )
    .await;

    assert_eq!(ra.status(), StatusCode::OK);
    assert_eq!(rb.status(), StatusCode::OK);
    assert!(started.elapsed() >= delay * 2);
}

#[actix_web::test]
async fn logout_ends_session() {
    let state = AppState::new(test_config(Duration::ZERO), Stores::memory());
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, state))).await;

    let cookie = login!(app, "tester");
    assert_eq!(
        test::call_service(&app, get("/count", &cookie).to_request()).await.status(),
        StatusCode::OK
    );

    let req = test::TestRequest::post()
        .uri("/logout")
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert_eq!(
        test::call_service(&app, get("/count", &cookie).to_request()).await.status(),
        StatusCode::UNAUTHORIZED
    );
}
