use axum::http::StatusCode;
use axum::response::Html;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Public login page.
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_SHELL)
}

/// Console shell served for every protected page route once the route guard
/// has passed. The browser code behind it loads data exclusively through the
/// guarded `/session` and `/api` endpoints, so nothing module-specific is in
/// the shell itself.
pub async fn shell() -> Html<&'static str> {
    Html(APP_SHELL)
}

const LOGIN_SHELL: &str = r#"<!doctype html>
<html><head><title>Campusgate - sign in</title></head>
<body><main id="login"></main><script src="/assets/login.js"></script></body></html>
"#;

const APP_SHELL: &str = r#"<!doctype html>
<html><head><title>Campusgate</title></head>
<body><main id="app"></main><script src="/assets/app.js"></script></body></html>
"#;
