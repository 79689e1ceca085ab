//! Guard policy: what a protected route requires.

use campusgate_core::GateError;

use crate::action::Action;
use crate::privileges::{Module, PrivilegeSet};

/// The requirement a guard enforces for one view or route.
///
/// There is no implicit "no requirement given, allow" fallthrough: a route
/// that genuinely needs no privilege must declare [`GuardPolicy::Unrestricted`]
/// so the decision is visible at the call site and auditable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardPolicy {
    /// Requires a raw privilege code in the resolved set.
    Privilege(String),

    /// Requires a (module, action) grant. The canonical form.
    Action { module: Module, action: Action },

    /// Explicitly no restriction beyond an authenticated session.
    Unrestricted,
}

impl GuardPolicy {
    pub fn action(module: impl Into<Module>, action: Action) -> Self {
        Self::Action {
            module: module.into(),
            action,
        }
    }

    pub fn privilege(code: impl Into<String>) -> Self {
        Self::Privilege(code.into())
    }

    /// Build a policy from optional requirements.
    ///
    /// A required privilege code takes precedence over a (module, action)
    /// pair. Returns `None` when neither is given: the caller must opt into
    /// [`GuardPolicy::Unrestricted`] explicitly rather than fall through.
    pub fn from_requirements(
        privilege: Option<String>,
        action: Option<(Module, Action)>,
    ) -> Option<Self> {
        match (privilege, action) {
            (Some(code), _) => Some(Self::Privilege(code)),
            (None, Some((module, action))) => Some(Self::Action { module, action }),
            (None, None) => None,
        }
    }

    /// Evaluate this policy against a fully resolved privilege set.
    pub fn evaluate(&self, privileges: &PrivilegeSet) -> Result<(), GateError> {
        match self {
            GuardPolicy::Unrestricted => Ok(()),
            GuardPolicy::Privilege(code) => {
                if privileges.has_privilege(code) {
                    Ok(())
                } else {
                    Err(GateError::missing_privilege(code.clone()))
                }
            }
            GuardPolicy::Action { module, action } => {
                if privileges.can_perform_action(module.as_str(), *action) {
                    Ok(())
                } else {
                    Err(GateError::unauthorized(module.as_str(), action.as_str()))
                }
            }
        }
    }
}
