//! Session-scoped privilege resolution with a per-session cache.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

use campusgate_auth::{Principal, PrivilegeSet, ReferenceDirectory};
use campusgate_core::GateResult;

struct CacheEntry {
    set: Arc<PrivilegeSet>,
    expires_at: Instant,
}

/// Resolves and caches the privilege set for authenticated sessions.
///
/// The cache is keyed by the session token, so it lives exactly as long as
/// the client session: logout removes the entry without any upstream call,
/// and a fresh login gets a fresh token and therefore a cold entry. A set
/// resolved before a logout/login boundary can never be served after it.
/// The cache is explicit state on the resolver, not an ambient module-level
/// singleton.
///
/// Entries expire after `ttl` (the session cookie's lifetime); sessions
/// abandoned without a logout stop occupying memory. Stale entries are
/// swept on every insert, so the map never holds more than the sessions
/// touched within one TTL window.
pub struct PrivilegeResolver {
    directory: Arc<dyn ReferenceDirectory>,
    ttl: Duration,
    cache: RwLock<HashMap<String, CacheEntry>>,
}

impl PrivilegeResolver {
    pub fn new(directory: Arc<dyn ReferenceDirectory>, ttl: Duration) -> Self {
        Self {
            directory,
            ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the session's privilege set, serving from cache when warm.
    ///
    /// Cold path fetches all four reference listings concurrently and merges
    /// them wholesale. Any fetch failure fails the resolution; a partial
    /// privilege payload is never trusted.
    pub async fn resolve(
        &self,
        token: &str,
        principal: &Principal,
    ) -> GateResult<Arc<PrivilegeSet>> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(token) {
                if Instant::now() < entry.expires_at {
                    return Ok(entry.set.clone());
                }
            }
        }

        let (roles, menus, role_menus, role_privileges) = tokio::try_join!(
            self.directory.fetch_roles(),
            self.directory.fetch_menus(),
            self.directory.fetch_role_menus(),
            self.directory.fetch_role_privileges(),
        )?;

        let set = Arc::new(PrivilegeSet::resolve(
            principal,
            &roles,
            &menus,
            &role_menus,
            &role_privileges,
        ));

        tracing::debug!(principal = %principal.id, "privilege set resolved");
        let mut cache = self.cache.write().await;
        let now = Instant::now();
        cache.retain(|_, entry| entry.expires_at > now);
        cache.insert(
            token.to_string(),
            CacheEntry {
                set: set.clone(),
                expires_at: now + self.ttl,
            },
        );
        Ok(set)
    }

    /// Drop the cached set for a session (logout).
    pub async fn invalidate(&self, token: &str) {
        self.cache.write().await.remove(token);
    }

    /// Force a recompute, bypassing any cached entry.
    pub async fn refresh(
        &self,
        token: &str,
        principal: &Principal,
    ) -> GateResult<Arc<PrivilegeSet>> {
        self.invalidate(token).await;
        self.resolve(token, principal).await
    }
}
