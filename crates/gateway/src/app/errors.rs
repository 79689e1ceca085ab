use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use campusgate_core::GateError;

/// Map a gate error to its HTTP surface.
///
/// `Unauthorized` names the module and action so the user understands why;
/// `MalformedResponse` is surfaced exactly like `UpstreamUnavailable` (a
/// malformed privilege payload is never partially trusted), with the real
/// detail kept to the logs.
pub fn gate_error_to_response(err: GateError) -> axum::response::Response {
    match err {
        GateError::Unauthenticated => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "no verified session")
        }
        GateError::Unauthorized { module, action } => (
            StatusCode::FORBIDDEN,
            axum::Json(json!({
                "error": "access_denied",
                "module": module,
                "action": action,
                "message": format!("missing '{action}' privilege for '{module}'"),
            })),
        )
            .into_response(),
        GateError::MissingPrivilege(privilege) => (
            StatusCode::FORBIDDEN,
            axum::Json(json!({
                "error": "access_denied",
                "privilege": privilege,
                "message": format!("missing privilege '{privilege}'"),
            })),
        )
            .into_response(),
        GateError::UpstreamUnavailable(detail) => {
            tracing::warn!(%detail, "upstream unavailable");
            json_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream_unavailable",
                "the backend is unreachable",
            )
        }
        GateError::MalformedResponse(detail) => {
            tracing::warn!(%detail, "malformed upstream response");
            json_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream_unavailable",
                "the backend returned an unusable response",
            )
        }
        GateError::InvalidId(detail) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", detail)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
