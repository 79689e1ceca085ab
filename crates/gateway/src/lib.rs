//! HTTP gateway: session cookie handling, route guard, privilege-gated
//! forwarding to the external backend.

pub mod app;
pub mod config;
pub mod context;
pub mod cookie;
pub mod guard;
pub mod middleware;
