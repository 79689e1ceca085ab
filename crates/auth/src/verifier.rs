//! Trait seams toward the external identity/reference-data backend.

use async_trait::async_trait;

use campusgate_core::GateResult;

use crate::menu::{Menu, RoleMenu, RolePrivilege};
use crate::principal::Principal;
use crate::roles::Role;

/// Verifies a bearer token against the external identity endpoint.
///
/// Fail-closed: an unreachable verifier is a verification failure, never
/// "assume authenticated".
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> GateResult<Principal>;
}

/// Read-only access to the backend's role/menu/privilege reference data.
#[async_trait]
pub trait ReferenceDirectory: Send + Sync {
    async fn fetch_roles(&self) -> GateResult<Vec<Role>>;
    async fn fetch_menus(&self) -> GateResult<Vec<Menu>>;
    async fn fetch_role_menus(&self) -> GateResult<Vec<RoleMenu>>;
    async fn fetch_role_privileges(&self) -> GateResult<Vec<RolePrivilege>>;
}
