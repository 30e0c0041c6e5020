use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Time source abstraction so admission control is testable without
/// wall-clock waiting
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Per-identifier fixed-window counter.
///
/// Invariant: at most one entry per key; `count` is monotonically
/// non-decreasing within a window and resets to 1 when a new window starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    /// Absolute timestamp when the window expires
    pub reset_time: DateTime<Utc>,
}

/// Outcome of a single admission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_time: DateTime<Utc>,
}

/// Injectable counter store.
///
/// `hit` is the admission check itself: the check-then-increment on a key is
/// a critical section (two concurrent requests must not both take the last
/// slot), so the read-modify-write has to be a single store operation rather
/// than a `get` followed by a `set`.
pub trait RateLimitStore: Send + Sync {
    /// Atomically count a request against `key` and decide admission
    fn hit(
        &self,
        key: &str,
        max_requests: u32,
        window: Duration,
        now: DateTime<Utc>,
    ) -> RateLimitDecision;

    fn get(&self, key: &str) -> Option<RateLimitEntry>;

    fn set(&self, key: &str, entry: RateLimitEntry);

    fn delete(&self, key: &str);

    /// Evict entries whose window has already expired. Memory hygiene only:
    /// expired entries are also treated as expired on read.
    fn sweep(&self, now: DateTime<Utc>);

    fn len(&self) -> usize;
}

/// Process-local store over a concurrent map.
///
/// Correct for a single-instance deployment only; horizontal scaling needs an
/// external counter store with atomic increment-and-expire.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    entries: DashMap<String, RateLimitEntry>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn hit(
        &self,
        key: &str,
        max_requests: u32,
        window: Duration,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        // The entry guard holds the shard lock for this key, making the
        // whole check-then-increment atomic with respect to other requests
        match self.entries.entry(key.to_string()) {
            Entry::Vacant(vacant) => {
                let reset_time = now + window;
                vacant.insert(RateLimitEntry {
                    count: 1,
                    reset_time,
                });
                RateLimitDecision {
                    allowed: true,
                    limit: max_requests,
                    remaining: max_requests.saturating_sub(1),
                    reset_time,
                }
            }
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();

                if entry.reset_time < now {
                    // Window expired: start a fresh one
                    entry.count = 1;
                    entry.reset_time = now + window;
                    return RateLimitDecision {
                        allowed: true,
                        limit: max_requests,
                        remaining: max_requests.saturating_sub(1),
                        reset_time: entry.reset_time,
                    };
                }

                if entry.count >= max_requests {
                    return RateLimitDecision {
                        allowed: false,
                        limit: max_requests,
                        remaining: 0,
                        reset_time: entry.reset_time,
                    };
                }

                entry.count += 1;
                RateLimitDecision {
                    allowed: true,
                    limit: max_requests,
                    remaining: max_requests.saturating_sub(entry.count),
                    reset_time: entry.reset_time,
                }
            }
        }
    }

    fn get(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    fn set(&self, key: &str, entry: RateLimitEntry) {
        self.entries.insert(key.to_string(), entry);
    }

    fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    fn sweep(&self, now: DateTime<Utc>) {
        self.entries.retain(|_, entry| entry.reset_time >= now);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::ManualClock;

    const WINDOW: i64 = 60;

    fn window() -> Duration {
        Duration::seconds(WINDOW)
    }

    #[test]
    fn test_first_hit_creates_entry() {
        let store = InMemoryRateLimitStore::new();
        let clock = ManualClock::default();
        let now = clock.now();

        let decision = store.hit("alice", 5, window(), now);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 4);
        assert_eq!(decision.reset_time, now + window());

        let entry = store.get("alice").unwrap();
        assert_eq!(entry.count, 1);
    }

    #[test]
    fn test_rejects_after_limit_reached() {
        let store = InMemoryRateLimitStore::new();
        let clock = ManualClock::default();
        let now = clock.now();

        let first = store.hit("alice", 2, window(), now);
        store.hit("alice", 2, window(), now);
        let third = store.hit("alice", 2, window(), now);

        assert!(!third.allowed);
        assert_eq!(third.remaining, 0);
        // The reset time of the original window is preserved so the caller
        // can compute retry-after
        assert_eq!(third.reset_time, first.reset_time);
        // Rejected hits do not grow the counter
        assert_eq!(store.get("alice").unwrap().count, 2);
    }

    #[test]
    fn test_window_expiry_resets_counter_to_one() {
        let store = InMemoryRateLimitStore::new();
        let clock = ManualClock::default();
        let now = clock.now();

        store.hit("alice", 2, window(), now);
        store.hit("alice", 2, window(), now);
        assert!(!store.hit("alice", 2, window(), now).allowed);

        let later = now + Duration::seconds(WINDOW + 1);
        let decision = store.hit("alice", 2, window(), later);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 1);
        assert_eq!(decision.reset_time, later + window());

        let entry = store.get("alice").unwrap();
        assert_eq!(entry.count, 1);
    }

    #[test]
    fn test_identifiers_are_independent() {
        let store = InMemoryRateLimitStore::new();
        let clock = ManualClock::default();
        let now = clock.now();

        store.hit("alice", 1, window(), now);
        assert!(!store.hit("alice", 1, window(), now).allowed);
        assert!(store.hit("bob", 1, window(), now).allowed);
    }

    #[test]
    fn test_sweep_removes_only_expired_entries() {
        let store = InMemoryRateLimitStore::new();
        let clock = ManualClock::default();
        let now = clock.now();

        store.hit("expired", 5, Duration::seconds(10), now);
        store.hit("live", 5, Duration::seconds(120), now);
        assert_eq!(store.len(), 2);

        store.sweep(now + Duration::seconds(30));
        assert_eq!(store.len(), 1);
        assert!(store.get("expired").is_none());
        assert!(store.get("live").is_some());
    }

    #[test]
    fn test_set_and_delete() {
        let store = InMemoryRateLimitStore::new();
        let clock = ManualClock::default();
        let entry = RateLimitEntry {
            count: 3,
            reset_time: clock.now() + window(),
        };

        store.set("alice", entry.clone());
        assert_eq!(store.get("alice"), Some(entry));

        store.delete("alice");
        assert!(store.get("alice").is_none());
    }

    #[test]
    fn test_concurrent_hits_never_overadmit() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryRateLimitStore::new());
        let clock = ManualClock::default();
        let now = clock.now();
        let max = 5u32;

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.hit("shared", max, Duration::seconds(60), now))
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|d| d.allowed)
            .count();

        assert_eq!(admitted as u32, max);
        assert_eq!(store.get("shared").unwrap().count, max);
    }
}
