//! Black-box tests: the real gateway router in front of a mock backend.
//!
//! The mock implements the backend's identity, reference-data and module
//! endpoints; the gateway is exercised over HTTP exactly as a browser would,
//! with redirects left unfollowed so the guard's behavior stays observable.

use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use reqwest::header;
use serde_json::json;

use campusgate_gateway::config::{GatewayConfig, PublicPaths};

const VALID_TOKEN: &str = "tok-clerk-0001";
const CLERK_ID: &str = "0191d6a0-5a82-7e11-9f21-3f4e5a6b7c8d";

// ─────────────────────────────────────────────────────────────────────────────
// Mock backend
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
struct Backend {
    verify_delay: Duration,
    reference_mode: ReferenceMode,
}

/// How the mock serves the reference-data listings.
#[derive(Clone, Copy)]
enum ReferenceMode {
    Normal,
    ServerError,
    Garbled,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            verify_delay: Duration::ZERO,
            reference_mode: ReferenceMode::Normal,
        }
    }
}

fn backend_router(backend: Backend) -> Router {
    Router::new()
        .route("/auth/login", post(backend_login))
        .route("/auth/me", get(backend_me))
        .route("/roles", get(backend_roles))
        .route("/menus", get(backend_menus))
        .route("/role-menus", get(backend_role_menus))
        .route("/role-privileges", get(backend_role_privileges))
        .route("/brands", get(backend_list_brands).post(backend_create_brand))
        .route("/brands/:id", delete(backend_delete_brand))
        .with_state(backend)
}

async fn backend_login(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    if body["email"] == "clerk@school.test" && body["password"] == "letmein" {
        (StatusCode::OK, Json(json!({ "access_token": VALID_TOKEN })))
    } else if body["email"] == "intern@school.test" && body["password"] == "letmein" {
        // A token no cookie header can carry.
        (StatusCode::OK, Json(json!({ "access_token": "tok\nintern" })))
    } else {
        // The backend's "{error}" shape.
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad credentials" })))
    }
}

async fn backend_me(State(backend): State<Backend>, headers: HeaderMap) -> impl IntoResponse {
    if !backend.verify_delay.is_zero() {
        tokio::time::sleep(backend.verify_delay).await;
    }

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if bearer == format!("Bearer {VALID_TOKEN}") {
        (
            StatusCode::OK,
            Json(json!({
                "id": CLERK_ID,
                "email": "clerk@school.test",
                "name": "Casey Clerk",
                "roles": ["clerk"],
            })),
        )
    } else {
        // The backend's "{message}" shape.
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "invalid token" })))
    }
}

async fn backend_roles(State(backend): State<Backend>) -> axum::response::Response {
    match backend.reference_mode {
        ReferenceMode::Normal => Json(json!([
            { "code": "clerk", "name": "Inventory clerk", "status": "active" }
        ]))
        .into_response(),
        ReferenceMode::ServerError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "reference store offline" })),
        )
            .into_response(),
        ReferenceMode::Garbled => "<!-- maintenance page -->".into_response(),
    }
}

async fn backend_menus() -> Json<serde_json::Value> {
    Json(json!([
        { "id": 1, "route": "/brands", "caption": "Brands" }
    ]))
}

async fn backend_role_menus() -> Json<serde_json::Value> {
    Json(json!([
        { "role_code": "clerk", "menu_id": 1 }
    ]))
}

async fn backend_role_privileges() -> Json<serde_json::Value> {
    Json(json!([
        { "role_code": "clerk", "description": "read", "status": "active" },
        { "role_code": "clerk", "description": "create", "status": "active" }
    ]))
}

async fn backend_list_brands() -> Json<serde_json::Value> {
    Json(json!([ { "id": 1, "name": "Acme" } ]))
}

async fn backend_create_brand(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    (StatusCode::CREATED, Json(json!({ "id": 2, "name": body["name"] })))
}

async fn backend_delete_brand() -> impl IntoResponse {
    // The gateway must deny the delete before it ever reaches here.
    (StatusCode::OK, Json(json!({ "deleted": true })))
}

// ─────────────────────────────────────────────────────────────────────────────
// Harness
// ─────────────────────────────────────────────────────────────────────────────

struct TestStack {
    gateway_url: String,
    backend_handle: tokio::task::JoinHandle<()>,
    gateway_handle: tokio::task::JoinHandle<()>,
}

impl TestStack {
    async fn spawn(backend: Backend, verify_timeout: Duration) -> Self {
        let backend_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind backend port");
        let backend_url = format!("http://{}", backend_listener.local_addr().unwrap());
        let backend_app = backend_router(backend);
        let backend_handle = tokio::spawn(async move {
            axum::serve(backend_listener, backend_app).await.unwrap();
        });

        let config = GatewayConfig {
            upstream_base_url: backend_url,
            bind_addr: "127.0.0.1:0".to_string(),
            cookie_secure: false,
            verify_timeout,
            public_paths: PublicPaths::defaults(),
        };
        let app = campusgate_gateway::app::build_app(config).expect("failed to build gateway");

        let gateway_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind gateway port");
        let gateway_url = format!("http://{}", gateway_listener.local_addr().unwrap());
        let gateway_handle = tokio::spawn(async move {
            axum::serve(gateway_listener, app).await.unwrap();
        });

        Self {
            gateway_url,
            backend_handle,
            gateway_handle,
        }
    }

    async fn spawn_default() -> Self {
        Self::spawn(Backend::default(), Duration::from_secs(5)).await
    }
}

impl Drop for TestStack {
    fn drop(&mut self) {
        self.backend_handle.abort();
        self.gateway_handle.abort();
    }
}

fn client() -> reqwest::Client {
    // Redirects stay visible to assertions.
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn session_cookie(token: &str) -> String {
    format!("token={token}")
}

fn set_cookie_values(res: &reqwest::Response) -> Vec<String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

fn assert_clears_session_cookie(res: &reqwest::Response) {
    let cleared = set_cookie_values(res)
        .iter()
        .any(|v| v.starts_with("token=;") && v.contains("Max-Age=0"));
    assert!(cleared, "expected a Set-Cookie clearing the session");
}

// ─────────────────────────────────────────────────────────────────────────────
// Route guard
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn page_request_without_cookie_redirects_to_login() {
    let stack = TestStack::spawn_default().await;

    let res = client()
        .get(format!("{}/dashboard", stack.gateway_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn rejected_token_redirects_and_clears_cookie() {
    let stack = TestStack::spawn_default().await;

    let res = client()
        .get(format!("{}/dashboard", stack.gateway_url))
        .header(header::COOKIE, session_cookie("expired-or-forged"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");
    assert_clears_session_cookie(&res);
}

#[tokio::test]
async fn valid_session_passes_through_unchanged() {
    let stack = TestStack::spawn_default().await;
    let http = client();

    let res = http
        .get(format!("{}/dashboard", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(set_cookie_values(&res).is_empty(), "no cookie churn on success");

    let res = http
        .get(format!("{}/session/me", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["email"], "clerk@school.test");
    assert_eq!(body["roles"][0], "clerk");
}

#[tokio::test]
async fn allow_listed_paths_bypass_the_guard() {
    let stack = TestStack::spawn_default().await;

    let res = client()
        .get(format!("{}/health", stack.gateway_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client()
        .get(format!("{}/login", stack.gateway_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn verifier_timeout_fails_closed() {
    let stack = TestStack::spawn(
        Backend {
            verify_delay: Duration::from_secs(3),
            ..Backend::default()
        },
        Duration::from_millis(300),
    )
    .await;

    let res = client()
        .get(format!("{}/dashboard", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");
    assert_clears_session_cookie(&res);
}

// ─────────────────────────────────────────────────────────────────────────────
// Session lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_installs_the_session_cookie() {
    let stack = TestStack::spawn_default().await;

    let res = client()
        .post(format!("{}/auth/login", stack.gateway_url))
        .json(&json!({ "email": "clerk@school.test", "password": "letmein" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let installed = set_cookie_values(&res)
        .iter()
        .any(|v| v.starts_with(&format!("token={VALID_TOKEN};")) && v.contains("HttpOnly"));
    assert!(installed, "expected an HttpOnly session cookie");
}

#[tokio::test]
async fn failed_login_sets_no_cookie() {
    let stack = TestStack::spawn_default().await;

    let res = client()
        .post(format!("{}/auth/login", stack.gateway_url))
        .json(&json!({ "email": "clerk@school.test", "password": "wrong" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie_values(&res).is_empty());
}

#[tokio::test]
async fn logout_clears_the_cookie_without_a_session() {
    let stack = TestStack::spawn_default().await;

    let res = client()
        .post(format!("{}/auth/logout", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_clears_session_cookie(&res);
}

// ─────────────────────────────────────────────────────────────────────────────
// Privileges and module guard
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn privileges_reflect_role_menu_and_role_privilege_data() {
    let stack = TestStack::spawn_default().await;

    let res = client()
        .get(format!("{}/session/privileges", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let grants = body["grants"].as_array().unwrap();

    let has = |module: &str, action: &str| {
        grants
            .iter()
            .any(|g| g["module"] == module && g["action"] == action)
    };
    assert!(has("brands", "read"));
    assert!(has("brands", "create"));
    assert!(!has("brands", "delete"));
}

#[tokio::test]
async fn refresh_recomputes_the_privilege_set() {
    let stack = TestStack::spawn_default().await;
    let http = client();

    // Warm the cache first.
    let res = http
        .get(format!("{}/session/privileges", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = http
        .post(format!("{}/session/privileges/refresh", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(!body["grants"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn forwarder_relays_granted_module_requests() {
    let stack = TestStack::spawn_default().await;
    let http = client();

    let res = http
        .get(format!("{}/api/brands", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body[0]["name"], "Acme");

    let res = http
        .post(format!("{}/api/brands", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .json(&json!({ "name": "Globex" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Globex");
}

#[tokio::test]
async fn forwarder_denies_missing_action_naming_it() {
    let stack = TestStack::spawn_default().await;

    let res = client()
        .delete(format!("{}/api/brands/1", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "access_denied");
    assert_eq!(body["module"], "brands");
    assert_eq!(body["action"], "delete");
}

#[tokio::test]
async fn single_record_get_requires_the_get_action() {
    let stack = TestStack::spawn_default().await;

    // The clerk role grants read (collection) but not get (single record).
    let res = client()
        .get(format!("{}/api/brands/1", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["action"], "get");
}

#[tokio::test]
async fn reference_data_outage_is_a_503_not_a_redirect() {
    let stack = TestStack::spawn(
        Backend {
            reference_mode: ReferenceMode::ServerError,
            ..Backend::default()
        },
        Duration::from_secs(5),
    )
    .await;

    let res = client()
        .get(format!("{}/session/privileges", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .send()
        .await
        .unwrap();

    // The session itself verified; only the reference fetch failed.
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(set_cookie_values(&res).is_empty(), "session cookie untouched");
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "upstream_unavailable");
}

#[tokio::test]
async fn garbled_reference_payload_is_a_503() {
    let stack = TestStack::spawn(
        Backend {
            reference_mode: ReferenceMode::Garbled,
            ..Backend::default()
        },
        Duration::from_secs(5),
    )
    .await;

    let res = client()
        .get(format!("{}/session/privileges", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "upstream_unavailable");
}

#[tokio::test]
async fn login_with_an_uncookieable_token_fails_without_a_cookie() {
    let stack = TestStack::spawn_default().await;

    let res = client()
        .post(format!("{}/auth/login", stack.gateway_url))
        .json(&json!({ "email": "intern@school.test", "password": "letmein" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(set_cookie_values(&res).is_empty());
}

#[tokio::test]
async fn unknown_module_is_denied_not_forwarded() {
    let stack = TestStack::spawn_default().await;

    let res = client()
        .get(format!("{}/api/payroll", stack.gateway_url))
        .header(header::COOKIE, session_cookie(VALID_TOKEN))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["module"], "payroll");
    assert_eq!(body["action"], "read");
}
