use axum::routing::{any, get, post};
use axum::Router;

pub mod pages;
pub mod proxy;
pub mod session;

/// Full routing tree. Public paths among these are exempted by the route
/// guard's allow-list; everything else requires a verified session.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(pages::health))
        .route("/login", get(pages::login_page))
        .route("/auth/login", post(session::login))
        .route("/auth/logout", post(session::logout))
        .route("/session/me", get(session::me))
        .route("/session/privileges", get(session::privileges))
        .route("/session/privileges/refresh", post(session::refresh_privileges))
        .route("/api/:module", any(proxy::forward_collection))
        .route("/api/:module/*rest", any(proxy::forward_item))
        .route("/", get(pages::shell))
        .route("/*path", get(pages::shell))
}
