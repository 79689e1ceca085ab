use campusgate_auth::Principal;

/// Session context for a verified request (principal + the raw bearer).
///
/// Inserted into request extensions by the route guard; its presence is the
/// proof that verification succeeded for this request. The raw token is kept
/// so the forwarder can relay it and the resolver can key its cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    principal: Principal,
    token: String,
}

impl SessionContext {
    pub fn new(principal: Principal, token: String) -> Self {
        Self { principal, token }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}
