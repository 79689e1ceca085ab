//! `campusgate-auth` — pure authentication/authorization boundary (fail-closed).
//!
//! This crate is intentionally decoupled from HTTP and storage: reference data
//! arrives through the [`ReferenceDirectory`] trait, token verification through
//! [`SessionVerifier`], and everything else is deterministic set computation.

pub mod action;
pub mod menu;
pub mod policy;
pub mod principal;
pub mod privileges;
pub mod roles;
pub mod verifier;

pub use action::Action;
pub use menu::{Menu, RoleMenu, RolePrivilege};
pub use policy::GuardPolicy;
pub use principal::Principal;
pub use privileges::{Module, PrivilegeSet};
pub use roles::{EntityStatus, Role, RoleCode};
pub use verifier::{ReferenceDirectory, SessionVerifier};
