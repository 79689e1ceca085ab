//! Edge route guard.
//!
//! Runs once per request, before any handler, and blocks until verification
//! completes. State machine per request:
//! `NO_TOKEN` -> redirect to `/login`;
//! `VERIFYING` -> call the session verifier;
//! `VERIFIED` -> request proceeds with a [`SessionContext`] attached;
//! `REJECTED` -> redirect to `/login` and clear the cookie (the clear is part
//! of the transition, not optional).
//!
//! This is the single authoritative verification path; nothing downstream
//! re-verifies the token.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use campusgate_auth::SessionVerifier;
use campusgate_core::GateError;

use crate::config::PublicPaths;
use crate::context::SessionContext;
use crate::cookie;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn SessionVerifier>,
    pub public_paths: Arc<PublicPaths>,
    pub cookie_secure: bool,
}

pub async fn route_guard(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    // Allow-list is evaluated before the state machine runs.
    if state.public_paths.matches(&path) {
        return next.run(req).await;
    }

    // NO_TOKEN
    let Some(token) = cookie::read_token(req.headers()) else {
        tracing::debug!(%path, "no session token, redirecting to login");
        return Redirect::to("/login").into_response();
    };

    // VERIFYING -> VERIFIED | REJECTED
    match state.verifier.verify(&token).await {
        Ok(principal) => {
            req.extensions_mut()
                .insert(SessionContext::new(principal, token));
            next.run(req).await
        }
        Err(err) => {
            // Same redirect for a rejected token and an unreachable
            // verifier (fail-closed); only the log tells them apart.
            match &err {
                GateError::Unauthenticated => {
                    tracing::info!(%path, "session rejected by verifier")
                }
                other => {
                    tracing::warn!(%path, error = %other, "verification failed closed")
                }
            }
            rejected(state.cookie_secure)
        }
    }
}

/// REJECTED: bounce to login with the session cookie removed.
fn rejected(cookie_secure: bool) -> Response {
    let mut response = Redirect::to("/login").into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie::clear_value(cookie_secure)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
