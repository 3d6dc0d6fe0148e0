use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use note_frontend::config::BackendSettings;
use note_frontend::policy::Policy;
use note_frontend::services::backend::BackendClient;
use note_frontend::startup::build_router;
use note_frontend::AppState;
use std::sync::Arc;
use tower::util::ServiceExt;
use tower_sessions::cookie::Key;

/// Router against a backend URL nothing listens on. Route gating and
/// public pages never reach the backend, so these tests stay offline.
fn test_state() -> AppState {
    let backend = BackendClient::new(BackendSettings {
        url: "http://localhost:9".to_string(),
    });
    AppState::new(
        Arc::new(backend),
        Policy::new(Some("admin@example.com".to_string())),
    )
}

#[tokio::test]
async fn health_check_works() {
    let app = build_router(test_state(), Key::generate());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn anonymous_protected_route_redirects_to_login() {
    let app = build_router(test_state(), Key::generate());

    for uri in ["/notes", "/notes/42/edit", "/notes/42/share", "/dashboard"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "uri: {uri}");
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login",
            "uri: {uri}"
        );
    }
}

#[tokio::test]
async fn gating_redirect_carries_a_session_cookie() {
    let app = build_router(test_state(), Key::generate());

    // Remembering the requested route writes the session, so the bounce
    // must hand out the signed session cookie the login flow relies on.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/notes/42/edit")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(response.headers().get(header::SET_COOKIE).is_some());
}

#[tokio::test]
async fn anonymous_root_redirects_to_login() {
    let app = build_router(test_state(), Key::generate());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn login_and_register_pages_render_anonymously() {
    let app = build_router(test_state(), Key::generate());

    for uri in ["/login", "/register"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "uri: {uri}");
    }
}

#[tokio::test]
async fn failed_login_leaves_the_session_untouched() {
    // The backend is unreachable, so the login attempt fails. The page
    // re-renders with an inline error and no session cookie is issued:
    // nothing was written to the token store.
    let app = build_router(test_state(), Key::generate());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("email=alice%40example.com&password=password123"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let page = std::str::from_utf8(&body).unwrap();
    assert!(page.contains("unreachable"));
}

#[tokio::test]
async fn login_with_invalid_form_is_rejected_inline() {
    let app = build_router(test_state(), Key::generate());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("email=not-an-email&password=x"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn metrics_endpoint_responds() {
    let app = build_router(test_state(), Key::generate());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn anonymous_track_beacon_is_accepted_and_dropped() {
    let app = build_router(test_state(), Key::generate());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/track")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"timeSpent":12,"page":"/notes"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

/// Full login round-trip. Requires the note backend to be running with
/// a seeded account; kept for manual verification.
#[tokio::test]
#[ignore = "Requires the note backend at http://localhost:8000 with a seeded test account"]
async fn login_reaches_the_originally_requested_route() {
    let backend = BackendClient::new(BackendSettings {
        url: "http://localhost:8000".to_string(),
    });
    let app = build_router(AppState::new(Arc::new(backend), Policy::default()), Key::generate());

    // Anonymous request to a protected route: bounced to /login with a
    // session cookie carrying the remembered target.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/notes/42/edit")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("gating should set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    // Login with valid credentials lands on the remembered route.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "email=test%40example.com&password=password123",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/notes/42/edit"
    );
}
