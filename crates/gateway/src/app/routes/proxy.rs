//! Generic authenticated module forwarder.
//!
//! One handler replaces a per-resource proxy catalog: the first path segment
//! under `/api` is the module, the required action derives from the method,
//! and the request is relayed upstream with the session bearer once the
//! privilege check passes.

use std::sync::Arc;

use axum::{
    body::{self, Body},
    extract::{Extension, Path, Request},
    http::{header, Method, StatusCode},
    response::Response,
};

use campusgate_auth::{Action, GuardPolicy};

use crate::app::{errors, services::AppServices};
use crate::context::SessionContext;
use crate::guard;

const MAX_FORWARD_BODY: usize = 2 * 1024 * 1024;

/// ANY /api/:module
pub async fn forward_collection(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(module): Path<String>,
    req: Request,
) -> Response {
    forward(services, session, module, None, req).await
}

/// ANY /api/:module/*rest
pub async fn forward_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path((module, rest)): Path<(String, String)>,
    req: Request,
) -> Response {
    forward(services, session, module, Some(rest), req).await
}

async fn forward(
    services: Arc<AppServices>,
    session: SessionContext,
    module: String,
    rest: Option<String>,
    req: Request,
) -> Response {
    let Some(action) = required_action(req.method(), rest.is_some()) else {
        return errors::json_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "method_not_allowed",
            "unsupported method",
        );
    };

    // Privilege decision completes before a single upstream byte moves.
    let policy = GuardPolicy::action(module.clone(), action);
    if let Err(response) = guard::authorize_request(&services, &session, &policy).await {
        return response;
    }

    let method = req.method().as_str().to_string();
    let mut path = module;
    if let Some(rest) = &rest {
        path = format!("{path}/{rest}");
    }
    if let Some(query) = req.uri().query() {
        path = format!("{path}?{query}");
    }

    let body_bytes = match body::to_bytes(req.into_body(), MAX_FORWARD_BODY).await {
        Ok(bytes) => bytes.to_vec(),
        Err(_) => {
            return errors::json_error(
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                "request body too large",
            )
        }
    };

    match services
        .upstream
        .forward(&method, &path, session.token(), body_bytes)
        .await
    {
        Ok(relayed) => {
            let status =
                StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::BAD_GATEWAY);
            let mut builder = Response::builder().status(status);
            if let Some(content_type) = relayed.content_type {
                builder = builder.header(header::CONTENT_TYPE, content_type);
            }
            builder.body(Body::from(relayed.body)).unwrap_or_else(|_| {
                errors::json_error(
                    StatusCode::BAD_GATEWAY,
                    "bad_gateway",
                    "invalid upstream response",
                )
            })
        }
        Err(err) => errors::gate_error_to_response(err),
    }
}

/// Method → action taxonomy. `get` is the single-record fetch, `read` the
/// collection listing.
fn required_action(method: &Method, is_item: bool) -> Option<Action> {
    match method.as_str() {
        "GET" => Some(if is_item { Action::Get } else { Action::Read }),
        "POST" => Some(Action::Create),
        "PUT" | "PATCH" => Some(Action::Update),
        "DELETE" => Some(Action::Delete),
        _ => None,
    }
}
