use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// In-memory sliding-window rate limiter.
///
/// Tracks badge scans per key (client address) and rejects when the count
/// exceeds `max_attempts` within `window`.
pub struct RateLimiter {
    max_attempts: u32,
    window: Duration,
    attempts: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    /// Create a new rate limiter.
    pub fn new(max_attempts: u32, window_secs: u64) -> Self {
        Self {
            max_attempts,
            window: Duration::from_secs(window_secs),
            attempts: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Vec<Instant>>> {
        // A panic while holding the lock leaves the map usable.
        self.attempts.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Check if a key is rate-limited. Returns `Ok(())` if allowed,
    /// or `Err(seconds_until_retry)` if limited.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        let mut map = self.entries();
        let now = Instant::now();

        let entries = map.entry(key.to_string()).or_default();
        entries.retain(|t| now.duration_since(*t) < self.window);

        if entries.len() >= self.max_attempts as usize {
            let retry_after = entries
                .first()
                .map(|oldest| {
                    self.window
                        .saturating_sub(now.duration_since(*oldest))
                        .as_secs()
                })
                .unwrap_or(self.window.as_secs());
            return Err(retry_after.max(1));
        }

        entries.push(now);
        Ok(())
    }

    /// Remove expired entries to prevent memory growth.
    pub fn cleanup(&self) {
        let mut map = self.entries();
        let now = Instant::now();
        map.retain(|_, entries| {
            entries.retain(|t| now.duration_since(*t) < self.window);
            !entries.is_empty()
        });
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.entries().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(3, 60);
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_ok());
        let retry = limiter.check("10.0.0.1").unwrap_err();
        assert!(retry >= 1 && retry <= 60);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, 60);
        assert!(limiter.check("a").is_ok());
        assert!(limiter.check("b").is_ok());
        assert!(limiter.check("a").is_err());
    }

    #[test]
    fn test_cleanup_drops_stale_keys() {
        let limiter = RateLimiter::new(5, 0);
        let _ = limiter.check("a");
        limiter.cleanup();
        assert_eq!(limiter.tracked_keys(), 0);
    }
}
