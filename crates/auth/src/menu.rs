//! Menu and association reference records (read-only backend data).

use serde::{Deserialize, Serialize};

use campusgate_core::MenuId;

use crate::roles::{EntityStatus, RoleCode};

/// A protected module/page of the admin console.
///
/// The `caption` is the module name privilege checks are keyed by
/// (e.g. "Brands", "Students").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: MenuId,
    pub route: String,
    pub caption: String,
}

/// Associates a role with a menu it may see. Unique per (role, menu) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMenu {
    pub role_code: RoleCode,
    pub menu_id: MenuId,
}

/// A free-text-described permission bound to a role.
///
/// The description is coarsened to the [`Action`](crate::Action) taxonomy
/// during privilege resolution; the raw text also survives as a privilege
/// code for `has_privilege` checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePrivilege {
    pub role_code: RoleCode,
    pub description: String,
    pub status: EntityStatus,
}
