//! Reqwest-backed client for the external backend.
//!
//! Failure policy is uniform and fail-closed: a non-2xx verification response,
//! a timeout, a connection error and an undecodable payload all end the
//! request as "not in a verified session". They differ only in what gets
//! logged and in which [`GateError`] variant carries the detail.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use campusgate_auth::{
    Menu, Principal, ReferenceDirectory, Role, RoleCode, RoleMenu, RolePrivilege, SessionVerifier,
};
use campusgate_core::{GateError, GateResult, PrincipalId};

/// Client for the identity and reference-data endpoints of the backend.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

/// An upstream response relayed verbatim by the module forwarder.
#[derive(Debug)]
pub struct ForwardedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Error payload as the backend actually sends it: sometimes `{"error": ..}`,
/// sometimes `{"message": ..}`. Decoded once, here.
#[derive(Debug, Deserialize)]
struct UpstreamFailure {
    error: Option<String>,
    message: Option<String>,
}

impl UpstreamFailure {
    fn detail(self) -> String {
        self.error
            .or(self.message)
            .unwrap_or_else(|| "no detail".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    access_token: String,
}

/// Identity payload from the whoami endpoint.
#[derive(Debug, Deserialize)]
struct PrincipalPayload {
    id: PrincipalId,
    email: String,
    name: String,
    roles: Vec<String>,
}

impl From<PrincipalPayload> for Principal {
    fn from(p: PrincipalPayload) -> Self {
        Principal {
            id: p.id,
            email: p.email,
            name: p.name,
            role_codes: p.roles.into_iter().map(RoleCode::new).collect(),
        }
    }
}

impl UpstreamClient {
    /// Build a client with the given request timeout.
    ///
    /// The timeout applies to every call, the verification one included: an
    /// unreachable verifier must become a rejection, not a hang.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> GateResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GateError::upstream(format!("client init: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for an access token.
    ///
    /// An upstream rejection (4xx) is `Unauthenticated`; the caller reports it
    /// without setting any cookie.
    pub async fn login(&self, email: &str, password: &str) -> GateResult<String> {
        let url = format!("{}/auth/login", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| transport_error("login", e))?;

        let status = response.status();
        if status.is_success() {
            let payload: LoginPayload = decode("login", response).await?;
            return Ok(payload.access_token);
        }

        let detail = failure_detail(response).await;
        if status.is_client_error() {
            tracing::info!(%status, %detail, "login rejected by upstream");
            Err(GateError::Unauthenticated)
        } else {
            Err(GateError::upstream(format!("login: {status}: {detail}")))
        }
    }

    /// Relay a module request upstream with the session bearer attached.
    pub async fn forward(
        &self,
        method: &str,
        path_and_query: &str,
        token: &str,
        body: Vec<u8>,
    ) -> GateResult<ForwardedResponse> {
        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|_| GateError::upstream(format!("forward: bad method {method}")))?;
        let url = format!("{}/{}", self.base_url, path_and_query.trim_start_matches('/'));

        let mut request = self.http.request(method, &url).bearer_auth(token);
        if !body.is_empty() {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error("forward", e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error("forward body", e))?
            .to_vec();

        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }

    /// GET a reference listing and decode it.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GateResult<T> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = failure_detail(response).await;
            return Err(GateError::upstream(format!("{path}: {status}: {detail}")));
        }

        decode(path, response).await
    }
}

#[async_trait]
impl SessionVerifier for UpstreamClient {
    async fn verify(&self, token: &str) -> GateResult<Principal> {
        let url = format!("{}/auth/me", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_error("verify", e))?;

        let status = response.status();
        if status.is_success() {
            let payload: PrincipalPayload = decode("verify", response).await?;
            return Ok(payload.into());
        }

        let detail = failure_detail(response).await;
        if status.is_client_error() {
            tracing::info!(%status, %detail, "token rejected by verifier");
            Err(GateError::Unauthenticated)
        } else {
            tracing::warn!(%status, %detail, "verifier returned server error");
            Err(GateError::upstream(format!("verify: {status}: {detail}")))
        }
    }
}

#[async_trait]
impl ReferenceDirectory for UpstreamClient {
    async fn fetch_roles(&self) -> GateResult<Vec<Role>> {
        self.get_json("/roles").await
    }

    async fn fetch_menus(&self) -> GateResult<Vec<Menu>> {
        self.get_json("/menus").await
    }

    async fn fetch_role_menus(&self) -> GateResult<Vec<RoleMenu>> {
        self.get_json("/role-menus").await
    }

    async fn fetch_role_privileges(&self) -> GateResult<Vec<RolePrivilege>> {
        self.get_json("/role-privileges").await
    }
}

fn transport_error(context: &str, err: reqwest::Error) -> GateError {
    if err.is_timeout() {
        tracing::warn!(context, "upstream request timed out");
        GateError::upstream(format!("{context}: timed out"))
    } else {
        tracing::warn!(context, error = %err, "upstream request failed");
        GateError::upstream(format!("{context}: {err}"))
    }
}

async fn decode<T: DeserializeOwned>(context: &str, response: reqwest::Response) -> GateResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| GateError::malformed(format!("{context}: {e}")))
}

/// Best-effort extraction of the upstream error detail for logs.
async fn failure_detail(response: reqwest::Response) -> String {
    match response.json::<UpstreamFailure>().await {
        Ok(failure) => failure.detail(),
        Err(_) => "unparseable error body".to_string(),
    }
}
