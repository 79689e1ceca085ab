//! `campusgate-core` — shared foundation for the gateway.
//!
//! This crate contains **pure** primitives (identifiers, the gate error
//! taxonomy); no HTTP or infrastructure concerns.

pub mod error;
pub mod id;

pub use error::{GateError, GateResult};
pub use id::{MenuId, PrincipalId};
