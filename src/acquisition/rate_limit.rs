//! Request pacing shared across concurrent fetch workers.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Serializes outbound request timing: no two turns are granted less than
/// `delay` apart, regardless of how many workers are waiting.
///
/// The single mutex-protected "last grant time" is the only shared mutable
/// state the fetch workers touch. The lock is held across the wait so grants
/// are provably serialized rather than merely delayed.
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    last_grant: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_grant: Mutex::new(None),
        }
    }

    /// Block until at least `delay` has elapsed since the last grant to any
    /// worker, then record this grant. The first caller proceeds immediately.
    pub async fn await_turn(&self) {
        let mut last = self.last_grant.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.delay {
                tokio::time::sleep(self.delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn first_turn_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        let start = Instant::now();
        limiter.await_turn().await;
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_grants_are_spaced() {
        let delay = Duration::from_millis(100);
        let limiter = Arc::new(RateLimiter::new(delay));
        let grants = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = Arc::clone(&limiter);
            let grants = Arc::clone(&grants);
            handles.push(tokio::spawn(async move {
                limiter.await_turn().await;
                grants.lock().unwrap().push(Instant::now());
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut times = grants.lock().unwrap().clone();
        times.sort();
        assert_eq!(times.len(), 4);
        for pair in times.windows(2) {
            let gap = pair[1].duration_since(pair[0]);
            // Small tolerance for the gap between grant and timestamp capture.
            assert!(
                gap >= Duration::from_millis(90),
                "adjacent grants only {gap:?} apart"
            );
        }
    }
}
