//! Session lifecycle and introspection endpoints.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use campusgate_auth::GuardPolicy;
use campusgate_core::GateError;

use crate::app::{errors, services::AppServices};
use crate::context::SessionContext;
use crate::cookie;
use crate::guard;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login (public): exchange credentials upstream, install the
/// session cookie from the returned access token. No cookie is set on
/// failure.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginRequest>,
) -> axum::response::Response {
    match services.upstream.login(&body.email, &body.password).await {
        Ok(token) => {
            let mut response = (
                StatusCode::OK,
                Json(serde_json::json!({ "authenticated": true })),
            )
                .into_response();
            match append_set_cookie(&mut response, cookie::set_value(&token, services.cookie_secure)) {
                Ok(()) => response,
                // A token the cookie can't carry is an unusable login; a 200
                // without a session would strand the client on the login page.
                Err(err) => errors::gate_error_to_response(err),
            }
        }
        Err(GateError::Unauthenticated) => errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "email or password rejected",
        ),
        Err(err) => errors::gate_error_to_response(err),
    }
}

/// POST /auth/logout (public): clear the cookie and drop the session's cached
/// privilege set. No upstream call; an already-invalid token ends the same
/// way.
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    if let Some(token) = cookie::read_token(&headers) {
        services.resolver.invalidate(&token).await;
    }

    let mut response = (
        StatusCode::OK,
        Json(serde_json::json!({ "authenticated": false })),
    )
        .into_response();
    match append_set_cookie(&mut response, cookie::clear_value(services.cookie_secure)) {
        Ok(()) => response,
        Err(err) => errors::gate_error_to_response(err),
    }
}

/// GET /session/me: the principal the route guard verified for this request.
pub async fn me(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    let principal = session.principal();
    Json(serde_json::json!({
        "id": principal.id.to_string(),
        "email": principal.email,
        "name": principal.name,
        "roles": principal
            .role_codes
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>(),
    }))
}

/// GET /session/privileges: the resolved grant set, for UI gating.
pub async fn privileges(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    // Explicitly unrestricted: any verified session may list its own grants.
    let privileges =
        match guard::authorize_request(&services, &session, &GuardPolicy::Unrestricted).await {
            Ok(p) => p,
            Err(response) => return response,
        };

    grants_response(&privileges)
}

/// POST /session/privileges/refresh: recompute, bypassing the cache.
pub async fn refresh_privileges(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match services
        .resolver
        .refresh(session.token(), session.principal())
        .await
    {
        Ok(privileges) => grants_response(&privileges),
        Err(err) => errors::gate_error_to_response(err),
    }
}

fn grants_response(privileges: &campusgate_auth::PrivilegeSet) -> axum::response::Response {
    let grants: Vec<_> = privileges
        .sorted_grants()
        .into_iter()
        .map(|(module, action)| {
            serde_json::json!({ "module": module, "action": action })
        })
        .collect();

    Json(serde_json::json!({ "grants": grants })).into_response()
}

fn append_set_cookie(
    response: &mut axum::response::Response,
    value: String,
) -> Result<(), GateError> {
    let value = HeaderValue::from_str(&value)
        .map_err(|_| GateError::malformed("session token is not representable in a cookie"))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}
