use serde::{Deserialize, Serialize};

use campusgate_core::PrincipalId;

use crate::roles::RoleCode;

/// The authenticated identity derived from a verified session token.
///
/// Re-derived on every verification; never persisted independently of the
/// session cookie. A privilege set resolved for one principal must never be
/// trusted across a logout/login boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: String,
    pub name: String,
    pub role_codes: Vec<RoleCode>,
}

impl Principal {
    pub fn has_role(&self, code: &RoleCode) -> bool {
        self.role_codes.contains(code)
    }
}
