use std::sync::Arc;

use chrono::Duration;

use crate::core::config::RateLimitConfig;
use crate::core::error::AppError;
use crate::modules::rate_limit::store::{Clock, RateLimitDecision, RateLimitStore};
use crate::shared::constants::{RAPID_POLICY_TAG, SUSTAINED_POLICY_TAG};

/// One fixed-window policy applied to an endpoint
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    /// Store-key prefix and header label ("rapid", "sustained")
    pub tag: &'static str,
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    /// Tier label used in response headers, e.g. "Rapid"
    pub fn header_tier(&self) -> &'static str {
        match self.tag {
            RAPID_POLICY_TAG => "Rapid",
            SUSTAINED_POLICY_TAG => "Sustained",
            other => other,
        }
    }
}

/// Quota snapshot returned alongside an admitted contact request
#[derive(Debug, Clone)]
pub struct ContactAdmission {
    pub rapid: RateLimitDecision,
    pub sustained: RateLimitDecision,
}

/// Two-tier fixed-window admission control for the contact endpoint.
///
/// Both tiers share the client identifier but are tracked under distinct
/// store keys so their counters do not interfere.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
    rapid: RateLimitPolicy,
    sustained: RateLimitPolicy,
}

impl RateLimiter {
    pub fn new(
        store: Arc<dyn RateLimitStore>,
        clock: Arc<dyn Clock>,
        config: &RateLimitConfig,
    ) -> Self {
        Self {
            store,
            clock,
            rapid: RateLimitPolicy {
                tag: RAPID_POLICY_TAG,
                max_requests: config.rapid_max_requests,
                window: Duration::seconds(config.rapid_window_secs as i64),
            },
            sustained: RateLimitPolicy {
                tag: SUSTAINED_POLICY_TAG,
                max_requests: config.sustained_max_requests,
                window: Duration::seconds(config.sustained_window_secs as i64),
            },
        }
    }

    pub fn rapid_policy(&self) -> &RateLimitPolicy {
        &self.rapid
    }

    pub fn sustained_policy(&self) -> &RateLimitPolicy {
        &self.sustained
    }

    /// Count one request for `identifier` against a single policy
    pub fn check(&self, identifier: &str, policy: &RateLimitPolicy) -> RateLimitDecision {
        let key = format!("{}:{}", policy.tag, identifier);
        self.store
            .hit(&key, policy.max_requests, policy.window, self.clock.now())
    }

    /// Apply both tiers in order: the rapid tier is evaluated first and its
    /// rejection short-circuits without consuming a sustained-tier slot.
    pub fn admit(&self, identifier: &str) -> Result<ContactAdmission, AppError> {
        let rapid = self.check(identifier, &self.rapid);
        if !rapid.allowed {
            tracing::warn!(
                identifier = %identifier,
                reset_time = %rapid.reset_time,
                "Rapid-tier rate limit exceeded"
            );
            return Err(AppError::RateLimited {
                tier: self.rapid.header_tier(),
                limit: rapid.limit,
                reset_time: rapid.reset_time,
            });
        }

        let sustained = self.check(identifier, &self.sustained);
        if !sustained.allowed {
            tracing::warn!(
                identifier = %identifier,
                reset_time = %sustained.reset_time,
                "Sustained-tier rate limit exceeded"
            );
            return Err(AppError::RateLimited {
                tier: self.sustained.header_tier(),
                limit: sustained.limit,
                reset_time: sustained.reset_time,
            });
        }

        Ok(ContactAdmission { rapid, sustained })
    }

    /// Spawn the recurring sweep evicting expired counters. Independent of
    /// request handling; expired entries are treated as expired on read
    /// either way, this only bounds store growth.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: std::time::Duration) {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a fresh store
            // is not swept at startup
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let before = limiter.store.len();
                limiter.store.sweep(limiter.clock.now());
                let evicted = before.saturating_sub(limiter.store.len());
                if evicted > 0 {
                    tracing::debug!(evicted, "Rate-limit sweep evicted expired entries");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::rate_limit::store::InMemoryRateLimitStore;
    use crate::shared::test_helpers::ManualClock;

    fn test_config() -> RateLimitConfig {
        RateLimitConfig {
            rapid_max_requests: 2,
            rapid_window_secs: 60,
            sustained_max_requests: 5,
            sustained_window_secs: 900,
            sweep_interval_secs: 300,
        }
    }

    fn limiter_with_clock(clock: Arc<ManualClock>) -> RateLimiter {
        RateLimiter::new(
            Arc::new(InMemoryRateLimitStore::new()),
            clock,
            &test_config(),
        )
    }

    #[test]
    fn test_two_rapid_requests_admitted_third_rejected() {
        let clock = Arc::new(ManualClock::default());
        let limiter = limiter_with_clock(Arc::clone(&clock));

        let first = limiter.admit("x").unwrap();
        assert_eq!(first.rapid.remaining, 1);
        assert_eq!(first.sustained.remaining, 4);

        clock.advance(chrono::Duration::seconds(10));
        let second = limiter.admit("x").unwrap();
        assert_eq!(second.rapid.remaining, 0);

        let err = limiter.admit("x").unwrap_err();
        match err {
            AppError::RateLimited { tier, limit, .. } => {
                assert_eq!(tier, "Rapid");
                assert_eq!(limit, 2);
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[test]
    fn test_rapid_rejection_does_not_consume_sustained_slot() {
        let clock = Arc::new(ManualClock::default());
        let limiter = limiter_with_clock(Arc::clone(&clock));

        limiter.admit("x").unwrap();
        limiter.admit("x").unwrap();
        // Rapid tier exhausted; these rejections must not touch the
        // sustained counter
        assert!(limiter.admit("x").is_err());
        assert!(limiter.admit("x").is_err());

        // Let the rapid window expire, sustained still has 3 of 5 left
        clock.advance(chrono::Duration::seconds(61));
        let admission = limiter.admit("x").unwrap();
        assert_eq!(admission.sustained.remaining, 2);
    }

    #[test]
    fn test_sustained_tier_rejects_after_five_in_fifteen_minutes() {
        let clock = Arc::new(ManualClock::default());
        let limiter = limiter_with_clock(Arc::clone(&clock));

        // Stay under the rapid tier by spacing requests a minute apart
        for _ in 0..5 {
            limiter.admit("x").unwrap();
            clock.advance(chrono::Duration::seconds(61));
        }

        let err = limiter.admit("x").unwrap_err();
        match err {
            AppError::RateLimited { tier, limit, .. } => {
                assert_eq!(tier, "Sustained");
                assert_eq!(limit, 5);
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[test]
    fn test_tiers_track_distinct_store_keys() {
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(InMemoryRateLimitStore::new());
        let limiter = RateLimiter::new(
            Arc::clone(&store) as Arc<dyn RateLimitStore>,
            clock,
            &test_config(),
        );

        limiter.admit("x").unwrap();
        use crate::modules::rate_limit::store::RateLimitStore as _;
        assert!(store.get("rapid:x").is_some());
        assert!(store.get("sustained:x").is_some());
        assert_eq!(store.get("rapid:x").unwrap().count, 1);
        assert_eq!(store.get("sustained:x").unwrap().count, 1);
    }

    #[test]
    fn test_identifiers_do_not_interfere() {
        let clock = Arc::new(ManualClock::default());
        let limiter = limiter_with_clock(clock);

        limiter.admit("x").unwrap();
        limiter.admit("x").unwrap();
        assert!(limiter.admit("x").is_err());
        assert!(limiter.admit("y").is_ok());
    }
}
