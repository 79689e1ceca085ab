//! Per-route privilege guard.
//!
//! This is the server-side rendering of the page/component guard: a handler
//! calls [`authorize_request`] before producing anything, so resolution
//! always completes before the allow/deny decision and no protected data is
//! emitted while the decision is pending. Resolution failure is a denial,
//! never an allow.

use std::sync::Arc;

use axum::response::Response;

use campusgate_auth::{GuardPolicy, PrivilegeSet};

use crate::app::{errors, services::AppServices};
use crate::context::SessionContext;

/// Enforce a guard policy for the current request.
///
/// Returns the resolved privilege set on success so handlers can reuse it
/// without a second resolution.
pub async fn authorize_request(
    services: &AppServices,
    session: &SessionContext,
    policy: &GuardPolicy,
) -> Result<Arc<PrivilegeSet>, Response> {
    let privileges = services
        .resolver
        .resolve(session.token(), session.principal())
        .await
        .map_err(errors::gate_error_to_response)?;

    if let Err(err) = policy.evaluate(&privileges) {
        tracing::info!(
            principal = %session.principal().id,
            policy = ?policy,
            "privilege denied"
        );
        return Err(errors::gate_error_to_response(err));
    }

    Ok(privileges)
}
