use moka::future::Cache;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use crate::config::RateLimitSettings;

/// One fixed window: at most `limit` requests per client every `period`
struct Window {
    name: &'static str,
    limit: u32,
    period: Duration,
    counters: Cache<String, Arc<Mutex<Counter>>>,
}

struct Counter {
    started: Instant,
    count: u32,
}

impl Window {
    fn new(name: &'static str, limit: u32, period: Duration, max_clients: u64) -> Self {
        // Entries expire once their window is over, so idle clients cost nothing
        let counters = Cache::builder()
            .max_capacity(max_clients)
            .time_to_live(period)
            .build();

        Self {
            name,
            limit,
            period,
            counters,
        }
    }

    /// Count one request; returns false if the window is already full
    async fn hit(&self, client: &str) -> bool {
        let counter = self
            .counters
            .get_with(client.to_string(), async {
                Arc::new(Mutex::new(Counter {
                    started: Instant::now(),
                    count: 0,
                }))
            })
            .await;

        let mut counter = counter.lock().unwrap_or_else(|e| e.into_inner());
        if counter.started.elapsed() >= self.period {
            counter.started = Instant::now();
            counter.count = 0;
        }
        if counter.count >= self.limit {
            return false;
        }
        counter.count += 1;
        true
    }
}

/// Per-client fixed-window rate limiter
///
/// A request is admitted only if every configured window has room. Windows
/// are checked in order from shortest to longest, and a rejected request
/// still counts against the windows checked before it.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Vec<Window>>,
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { window: &'static str, limit: u32 },
}

impl RateLimiter {
    const MAX_CLIENTS: u64 = 100_000;

    pub fn new(settings: &RateLimitSettings) -> Self {
        Self::with_windows(&[
            ("second", settings.per_second, Duration::from_secs(1)),
            ("hour", settings.per_hour, Duration::from_secs(3600)),
            ("day", settings.per_day, Duration::from_secs(86_400)),
        ])
    }

    /// Build a limiter from `(name, limit, period)` triples; zero limits are skipped
    pub fn with_windows(windows: &[(&'static str, u32, Duration)]) -> Self {
        let windows = windows
            .iter()
            .filter(|(_, limit, _)| *limit > 0)
            .map(|&(name, limit, period)| Window::new(name, limit, period, Self::MAX_CLIENTS))
            .collect();

        Self {
            windows: Arc::new(windows),
        }
    }

    /// Active windows as `(name, limit)`, shortest first
    pub fn limits(&self) -> Vec<(&'static str, u32)> {
        self.windows.iter().map(|w| (w.name, w.limit)).collect()
    }

    pub async fn check(&self, client: &str) -> RateDecision {
        for window in self.windows.iter() {
            if !window.hit(client).await {
                tracing::warn!(
                    "Rate limit exceeded for {}: {} per {}",
                    client,
                    window.limit,
                    window.name
                );
                return RateDecision::Limited {
                    window: window.name,
                    limit: window.limit,
                };
            }
        }
        RateDecision::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_per_client() {
        let limiter = RateLimiter::with_windows(&[("minute", 2, Duration::from_secs(60))]);

        assert_eq!(limiter.check("10.0.0.1").await, RateDecision::Allowed);
        assert_eq!(limiter.check("10.0.0.1").await, RateDecision::Allowed);
        assert_eq!(
            limiter.check("10.0.0.1").await,
            RateDecision::Limited { window: "minute", limit: 2 }
        );

        // Other clients have their own counters
        assert_eq!(limiter.check("10.0.0.2").await, RateDecision::Allowed);
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimiter::with_windows(&[("short", 1, Duration::from_millis(50))]);

        assert_eq!(limiter.check("client").await, RateDecision::Allowed);
        assert!(matches!(limiter.check("client").await, RateDecision::Limited { .. }));

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(limiter.check("client").await, RateDecision::Allowed);
    }

    #[tokio::test]
    async fn test_longer_window_applies() {
        let limiter = RateLimiter::with_windows(&[
            ("short", 10, Duration::from_secs(1)),
            ("long", 1, Duration::from_secs(3600)),
        ]);

        assert_eq!(limiter.check("client").await, RateDecision::Allowed);
        assert_eq!(
            limiter.check("client").await,
            RateDecision::Limited { window: "long", limit: 1 }
        );
    }

    #[tokio::test]
    async fn test_rejection_counts_in_shorter_windows() {
        let limiter = RateLimiter::with_windows(&[
            ("short", 2, Duration::from_secs(60)),
            ("long", 1, Duration::from_secs(3600)),
        ]);

        assert_eq!(limiter.check("client").await, RateDecision::Allowed);
        assert_eq!(
            limiter.check("client").await,
            RateDecision::Limited { window: "long", limit: 1 }
        );
        // The request rejected by "long" used up the last "short" slot
        assert_eq!(
            limiter.check("client").await,
            RateDecision::Limited { window: "short", limit: 2 }
        );
    }

    #[test]
    fn test_default_settings_limit_per_second_only() {
        let limiter = RateLimiter::new(&RateLimitSettings::default());
        assert_eq!(limiter.limits(), vec![("second", 1)]);
    }

    #[tokio::test]
    async fn test_default_settings_allow_steady_traffic() {
        let limiter = RateLimiter::new(&RateLimitSettings::default());

        assert_eq!(limiter.check("client").await, RateDecision::Allowed);
        assert_eq!(
            limiter.check("client").await,
            RateDecision::Limited { window: "second", limit: 1 }
        );

        tokio::time::sleep(Duration::from_millis(1050)).await;
        assert_eq!(limiter.check("client").await, RateDecision::Allowed);
    }

    #[test]
    fn test_configured_hour_and_day_windows() {
        let settings = RateLimitSettings {
            per_second: 1,
            per_hour: 50,
            per_day: 200,
        };
        let limiter = RateLimiter::new(&settings);
        assert_eq!(
            limiter.limits(),
            vec![("second", 1), ("hour", 50), ("day", 200)]
        );
    }

    #[tokio::test]
    async fn test_zero_limit_disables_window() {
        let settings = RateLimitSettings {
            per_second: 0,
            per_hour: 0,
            per_day: 0,
        };
        let limiter = RateLimiter::new(&settings);
        for _ in 0..5 {
            assert_eq!(limiter.check("client").await, RateDecision::Allowed);
        }
    }
}
