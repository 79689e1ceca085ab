//! Gate error taxonomy.
//!
//! Every failure on the verification/authorization path collapses to one of
//! these variants. The gate is fail-closed: an ambiguous outcome is never
//! treated as "allowed".

use thiserror::Error;

/// Result type used across the gate.
pub type GateResult<T> = Result<T, GateError>;

/// Authorization-gate error.
///
/// `Unauthenticated` and `UpstreamUnavailable` are surfaced to the browser
/// identically (redirect to the login page); only logs distinguish them.
/// `Unauthorized` is surfaced as an access-denied response naming the module
/// and action, so the user understands why.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// No token, or a token the verifier rejected.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Valid principal, insufficient privilege for (module, action).
    #[error("access denied: {module} – {action}")]
    Unauthorized { module: String, action: String },

    /// Valid principal, missing a named privilege code.
    #[error("access denied: privilege '{0}' required")]
    MissingPrivilege(String),

    /// Verifier or reference-data service unreachable or timed out.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Unexpected payload shape from the external backend.
    ///
    /// Treated as `UpstreamUnavailable` at the surface; a malformed privilege
    /// payload is never partially trusted.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl GateError {
    pub fn unauthorized(module: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Unauthorized {
            module: module.into(),
            action: action.into(),
        }
    }

    pub fn missing_privilege(code: impl Into<String>) -> Self {
        Self::MissingPrivilege(code.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Whether a page request carrying this error should be bounced to login.
    ///
    /// Covers both "not in a verified session" cases; `Unauthorized` is not
    /// among them (that one is reported in place, not redirected).
    pub fn redirects_to_login(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::UpstreamUnavailable(_) | Self::MalformedResponse(_)
        )
    }
}
