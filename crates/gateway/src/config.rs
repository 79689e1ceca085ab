//! Gateway configuration, read from the environment at startup.

use std::time::Duration;

/// Paths the route guard lets through without a session.
///
/// This is a configuration surface, not logic: the set is evaluated before
/// the guard's state machine runs. Patterns are exact paths, or prefixes
/// when they end in `*`.
#[derive(Debug, Clone)]
pub struct PublicPaths {
    patterns: Vec<String>,
}

impl PublicPaths {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Login page, the auth endpoints that do their own auth, health probe,
    /// static assets.
    pub fn defaults() -> Self {
        Self::new(
            [
                "/login",
                "/health",
                "/auth/login",
                "/auth/logout",
                "/assets/*",
                "/favicon.ico",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        )
    }

    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| {
            if let Some(prefix) = pattern.strip_suffix('*') {
                path.starts_with(prefix)
            } else {
                pattern == path
            }
        })
    }
}

/// Runtime configuration for the gateway process.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the external REST backend.
    pub upstream_base_url: String,

    /// Listen address.
    pub bind_addr: String,

    /// Mark the session cookie `Secure` (set in production).
    pub cookie_secure: bool,

    /// Timeout for every upstream call, verification included.
    pub verify_timeout: Duration,

    /// Route-guard allow-list.
    pub public_paths: PublicPaths,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let upstream_base_url = std::env::var("UPSTREAM_BASE_URL").unwrap_or_else(|_| {
            tracing::warn!("UPSTREAM_BASE_URL not set; using http://127.0.0.1:9000");
            "http://127.0.0.1:9000".to_string()
        });

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let verify_timeout = std::env::var("VERIFY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(5));

        let public_paths = match std::env::var("PUBLIC_PATHS") {
            Ok(raw) => PublicPaths::new(
                raw.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            Err(_) => PublicPaths::defaults(),
        };

        Self {
            upstream_base_url,
            bind_addr,
            cookie_secure,
            verify_timeout,
            public_paths,
        }
    }
}
