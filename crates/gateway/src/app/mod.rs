//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: upstream client + privilege resolver shared by handlers
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;
use std::time::Duration;

use axum::Extension;
use axum::Router;
use tower::ServiceBuilder;

use campusgate_upstream::{PrivilegeResolver, UpstreamClient};

use crate::config::GatewayConfig;
use crate::cookie;
use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Every route passes through the route guard; public paths are exempted by
/// the guard's allow-list, not by sitting outside it.
pub fn build_app(config: GatewayConfig) -> anyhow::Result<Router> {
    let upstream = Arc::new(UpstreamClient::new(
        &config.upstream_base_url,
        config.verify_timeout,
    )?);
    // Cached privilege sets live no longer than the session cookie does.
    let resolver = PrivilegeResolver::new(
        upstream.clone(),
        Duration::from_secs(cookie::SESSION_TTL_SECS),
    );

    let services = Arc::new(services::AppServices {
        upstream: upstream.clone(),
        resolver,
        cookie_secure: config.cookie_secure,
    });

    let auth_state = middleware::AuthState {
        verifier: upstream,
        public_paths: Arc::new(config.public_paths),
        cookie_secure: config.cookie_secure,
    };

    // ServiceBuilder order is outermost-first: the route guard wraps
    // everything, the service extension sits inside it.
    Ok(routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::route_guard,
            ))
            .layer(Extension(services)),
    ))
}
