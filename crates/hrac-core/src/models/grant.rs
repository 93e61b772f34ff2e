//! The shared temporal-grant shape.
//!
//! Role grants, user overrides and role assignments are all time-boxed,
//! revocable authorization edges: `{assigned_at, assigned_by?, expires_at?}`.
//! Expiry semantics live here so every consumer treats an expired row
//! the same way — as if it did not exist.

use chrono::{DateTime, Utc};

/// A time-boxed authorization edge between two identities.
pub trait TemporalGrant {
    fn assigned_at(&self) -> DateTime<Utc>;
    fn expires_at(&self) -> Option<DateTime<Utc>>;

    /// An edge with `expires_at` at or before `now` contributes nothing.
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|t| t <= now)
    }
}

/// The winning row among duplicates for one (subject, permission) pair:
/// non-expired, most recently assigned (last-writer-wins).
pub fn latest_effective<T: TemporalGrant>(rows: &[T], now: DateTime<Utc>) -> Option<&T> {
    rows.iter()
        .filter(|r| !r.is_expired(now))
        .max_by_key(|r| r.assigned_at())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    struct Edge {
        assigned_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        granted: bool,
    }

    impl TemporalGrant for Edge {
        fn assigned_at(&self) -> DateTime<Utc> {
            self.assigned_at
        }
        fn expires_at(&self) -> Option<DateTime<Utc>> {
            self.expires_at
        }
    }

    #[test]
    fn no_expiry_never_expires() {
        let now = Utc::now();
        let edge = Edge {
            assigned_at: now,
            expires_at: None,
            granted: true,
        };
        assert!(!edge.is_expired(now + Duration::days(365)));
    }

    #[test]
    fn past_expiry_is_expired() {
        let now = Utc::now();
        let edge = Edge {
            assigned_at: now - Duration::days(2),
            expires_at: Some(now - Duration::days(1)),
            granted: true,
        };
        assert!(edge.is_expired(now));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let edge = Edge {
            assigned_at: now,
            expires_at: Some(now),
            granted: true,
        };
        // expires_at == now counts as expired.
        assert!(edge.is_expired(now));
    }

    #[test]
    fn latest_effective_skips_expired_rows() {
        let now = Utc::now();
        let rows = vec![
            Edge {
                assigned_at: now - Duration::hours(1),
                expires_at: None,
                granted: true,
            },
            // Newer but expired — must not win.
            Edge {
                assigned_at: now,
                expires_at: Some(now - Duration::minutes(1)),
                granted: false,
            },
        ];
        let winner = latest_effective(&rows, now).unwrap();
        assert!(winner.granted);
    }

    #[test]
    fn latest_effective_is_last_writer_wins() {
        let now = Utc::now();
        let rows = vec![
            Edge {
                assigned_at: now - Duration::hours(2),
                expires_at: None,
                granted: true,
            },
            Edge {
                assigned_at: now - Duration::hours(1),
                expires_at: None,
                granted: false,
            },
        ];
        let winner = latest_effective(&rows, now).unwrap();
        assert!(!winner.granted);
    }

    #[test]
    fn latest_effective_empty_is_none() {
        let now = Utc::now();
        let rows: Vec<Edge> = Vec::new();
        assert!(latest_effective(&rows, now).is_none());
    }
}
