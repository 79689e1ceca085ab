//! Privilege set resolution (pure merge, no IO).

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use campusgate_core::MenuId;

use crate::action::Action;
use crate::menu::{Menu, RoleMenu, RolePrivilege};
use crate::principal::Principal;
use crate::roles::{Role, RoleCode};

/// Module name a privilege check is keyed by (a menu caption, e.g. "Brands").
///
/// Names are case-insensitive: the backend captions modules ("Brands") while
/// request paths spell them lowercase ("/api/brands"). Stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Module(Cow<'static, str>);

impl Module {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        if name.chars().any(|c| c.is_ascii_uppercase()) {
            Self(Cow::Owned(name.to_ascii_lowercase()))
        } else {
            Self(name)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Module {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Module {
    fn from(value: &str) -> Self {
        Module::new(value.to_string())
    }
}

impl From<String> for Module {
    fn from(value: String) -> Self {
        Module::new(value)
    }
}

/// The resolved collection of (module, action) grants for one principal.
///
/// Derived, in-memory only. Recomputed wholesale whenever the session's
/// principal changes; never patched incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrivilegeSet {
    grants: HashSet<(Module, Action)>,
    codes: HashSet<String>,
}

impl PrivilegeSet {
    /// Merge a principal's roles, menu associations and privilege records
    /// into a single grant set.
    ///
    /// Per active role: modules come from its `RoleMenu` entries, actions from
    /// its active `RolePrivilege` descriptions, and the grants are the cross
    /// product of the two. Roles the principal does not hold, inactive roles,
    /// inactive privileges, and associations pointing at unknown menus all
    /// contribute nothing.
    pub fn resolve(
        principal: &Principal,
        roles: &[Role],
        menus: &[Menu],
        role_menus: &[RoleMenu],
        role_privileges: &[RolePrivilege],
    ) -> Self {
        let menu_by_id: HashMap<MenuId, &Menu> = menus.iter().map(|m| (m.id, m)).collect();

        let active: HashSet<&RoleCode> = roles
            .iter()
            .filter(|r| r.status.is_active() && principal.has_role(&r.code))
            .map(|r| &r.code)
            .collect();

        let mut grants = HashSet::new();
        let mut codes = HashSet::new();

        for role_code in active.iter().copied() {
            let modules: Vec<Module> = role_menus
                .iter()
                .filter(|rm| &rm.role_code == role_code)
                .filter_map(|rm| menu_by_id.get(&rm.menu_id))
                .map(|menu| Module::new(menu.caption.clone()))
                .collect();

            let mut actions: HashSet<Action> = HashSet::new();
            for privilege in role_privileges
                .iter()
                .filter(|rp| &rp.role_code == role_code && rp.status.is_active())
            {
                actions.extend(actions_in(&privilege.description));
                codes.insert(normalize_code(&privilege.description));
            }

            for module in &modules {
                for action in &actions {
                    grants.insert((module.clone(), *action));
                }
            }
        }

        Self { grants, codes }
    }

    /// The canonical check used by route and page gating.
    pub fn can_perform_action(&self, module: &str, action: Action) -> bool {
        self.grants
            .contains(&(Module::new(module.to_string()), action))
    }

    /// Lower-level check against a raw privilege code (a privilege
    /// description, compared case-insensitively).
    pub fn has_privilege(&self, code: &str) -> bool {
        self.codes.contains(&normalize_code(code))
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty() && self.codes.is_empty()
    }

    /// Grants sorted for stable JSON output.
    pub fn sorted_grants(&self) -> Vec<(String, Action)> {
        let mut out: Vec<(String, Action)> = self
            .grants
            .iter()
            .map(|(m, a)| (m.as_str().to_string(), *a))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.as_str().cmp(b.1.as_str())));
        out
    }
}

/// Coarsen a free-text privilege description to the action taxonomy.
///
/// Every whitespace/punctuation-separated word that parses as an action
/// counts, so "create and update records" grants both.
fn actions_in(description: &str) -> Vec<Action> {
    description
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .filter_map(|w| w.parse::<Action>().ok())
        .collect()
}

fn normalize_code(description: &str) -> String {
    description.trim().to_ascii_lowercase()
}
