// src/crawl/throttle.rs
// =============================================================================
// Pause before every profile request.
//
// Weibo rate-limits per caller, and a ban ends the whole crawl, so we wait a
// random 3-10 whole seconds before each profile call. Random rather than
// fixed so the request pattern looks less like a bot.
// =============================================================================

use rand::Rng;
use std::time::Duration;
use tracing::debug;

const MIN_PAUSE_SECS: u64 = 3;
const MAX_PAUSE_SECS: u64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    min_secs: u64,
    max_secs: u64,
}

impl Default for Throttle {
    fn default() -> Self {
        Self {
            min_secs: MIN_PAUSE_SECS,
            max_secs: MAX_PAUSE_SECS,
        }
    }
}

impl Throttle {
    /// Picks the next pause, uniformly in [min, max] seconds
    pub fn next_pause(&self) -> Duration {
        Duration::from_secs(rand::rng().random_range(self.min_secs..=self.max_secs))
    }

    /// Sleeps for a freshly picked pause
    pub async fn pause(&self) {
        let pause = self.next_pause();
        debug!(secs = pause.as_secs(), "throttling before next request");
        tokio::time::sleep(pause).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_stays_in_range() {
        let throttle = Throttle::default();
        for _ in 0..200 {
            let secs = throttle.next_pause().as_secs();
            assert!((3..=10).contains(&secs), "{secs}s out of range");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_actually_sleeps() {
        let start = tokio::time::Instant::now();
        Throttle::default().pause().await;
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
