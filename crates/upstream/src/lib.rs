//! `campusgate-upstream` — HTTP client for the external REST backend.
//!
//! Everything crossing this boundary is decoded exactly once into typed
//! results; downstream code never re-sniffs response shapes.

pub mod client;
pub mod resolver;

pub use client::{ForwardedResponse, UpstreamClient};
pub use resolver::PrivilegeResolver;
