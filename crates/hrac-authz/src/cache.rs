//! Time-boxed permission decision cache.
//!
//! Keyed by user ID so that a change to one user's grants can evict
//! exactly that user's decisions. Role-level changes affect an unknown
//! set of users and evict everything via [`DecisionCache::clear`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

type DecisionKey = (String, Option<String>);

/// Cached `has_permission` decisions with a fixed time-to-live.
///
/// A TTL of zero disables the cache entirely: `get` always misses and
/// `insert` is a no-op.
pub struct DecisionCache {
    ttl: Duration,
    entries: DashMap<Uuid, HashMap<DecisionKey, (bool, Instant)>>,
}

impl DecisionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, user_id: Uuid, code: &str, resource: Option<&str>) -> Option<bool> {
        if self.ttl.is_zero() {
            return None;
        }
        let key = (code.to_string(), resource.map(str::to_string));
        let entry = self.entries.get(&user_id)?;
        let (decision, deadline) = entry.get(&key)?;
        if Instant::now() >= *deadline {
            return None;
        }
        Some(*decision)
    }

    pub fn insert(&self, user_id: Uuid, code: &str, resource: Option<&str>, decision: bool) {
        if self.ttl.is_zero() {
            return;
        }
        let key = (code.to_string(), resource.map(str::to_string));
        let deadline = Instant::now() + self.ttl;
        self.entries
            .entry(user_id)
            .or_default()
            .insert(key, (decision, deadline));
    }

    /// Evict every cached decision for one user. Called after writes to
    /// that user's overrides or role assignments.
    pub fn invalidate_user(&self, user_id: Uuid) {
        self.entries.remove(&user_id);
    }

    /// Evict everything. Called after role-permission changes, which
    /// affect every user holding the role.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl() {
        let cache = DecisionCache::new(Duration::from_secs(60));
        let user = Uuid::new_v4();

        cache.insert(user, "USER_CREATE", None, true);
        assert_eq!(cache.get(user, "USER_CREATE", None), Some(true));
    }

    #[test]
    fn resource_is_part_of_the_key() {
        let cache = DecisionCache::new(Duration::from_secs(60));
        let user = Uuid::new_v4();

        cache.insert(user, "DOC_READ", Some("Payroll"), true);
        assert_eq!(cache.get(user, "DOC_READ", Some("Payroll")), Some(true));
        assert_eq!(cache.get(user, "DOC_READ", Some("Reviews")), None);
        assert_eq!(cache.get(user, "DOC_READ", None), None);
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let cache = DecisionCache::new(Duration::ZERO);
        let user = Uuid::new_v4();

        cache.insert(user, "USER_CREATE", None, true);
        assert_eq!(cache.get(user, "USER_CREATE", None), None);
    }

    #[test]
    fn invalidate_user_is_scoped() {
        let cache = DecisionCache::new(Duration::from_secs(60));
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        cache.insert(alice, "USER_CREATE", None, true);
        cache.insert(bob, "USER_CREATE", None, false);

        cache.invalidate_user(alice);
        assert_eq!(cache.get(alice, "USER_CREATE", None), None);
        assert_eq!(cache.get(bob, "USER_CREATE", None), Some(false));
    }

    #[test]
    fn clear_evicts_everything() {
        let cache = DecisionCache::new(Duration::from_secs(60));
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        cache.insert(alice, "USER_CREATE", None, true);
        cache.insert(bob, "ROLE_READ", None, true);

        cache.clear();
        assert_eq!(cache.get(alice, "USER_CREATE", None), None);
        assert_eq!(cache.get(bob, "ROLE_READ", None), None);
    }
}
