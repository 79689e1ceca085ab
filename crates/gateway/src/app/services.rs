//! Shared service wiring handed to handlers via `Extension`.

use std::sync::Arc;

use campusgate_upstream::{PrivilegeResolver, UpstreamClient};

pub struct AppServices {
    pub upstream: Arc<UpstreamClient>,
    pub resolver: PrivilegeResolver,
    pub cookie_secure: bool,
}
