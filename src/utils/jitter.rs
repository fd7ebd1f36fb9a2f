//! Randomized pacing between network operations
//!
//! Every outbound step of a run is separated by a uniformly random pause so
//! the request pattern does not look scripted to the target sites. Each call
//! site picks its own range from [`DelayConfig`](crate::config::DelayConfig).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::DelayConfig;

/// Half-open millisecond range `[min_ms, max_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const ZERO: Self = Self {
        min_ms: 0,
        max_ms: 0,
    };

    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Draw a duration uniformly from the range
    ///
    /// An empty or inverted range yields `min_ms`.
    pub fn sample(&self) -> Duration {
        let ms = if self.min_ms >= self.max_ms {
            self.min_ms
        } else {
            rand::rng().random_range(self.min_ms..self.max_ms)
        };
        Duration::from_millis(ms)
    }
}

impl From<(u64, u64)> for DelayRange {
    fn from((min_ms, max_ms): (u64, u64)) -> Self {
        Self::new(min_ms, max_ms)
    }
}

/// The call sites that pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayKind {
    Retry,
    CacheHit,
    PreDownload,
    Error,
    NextDomain,
}

/// Rate limiter handing out randomized waits per call site
#[derive(Debug, Clone)]
pub struct DelayPolicy {
    delays: DelayConfig,
}

impl DelayPolicy {
    pub fn new(delays: DelayConfig) -> Self {
        Self { delays }
    }

    /// A policy that never sleeps
    pub fn disabled() -> Self {
        Self::new(DelayConfig::none())
    }

    pub fn range_for(&self, kind: DelayKind) -> DelayRange {
        match kind {
            DelayKind::Retry => self.delays.retry,
            DelayKind::CacheHit => self.delays.cache,
            DelayKind::PreDownload => self.delays.download,
            DelayKind::Error => self.delays.error,
            DelayKind::NextDomain => self.delays.next,
        }
    }

    /// Suspend the caller for a random duration drawn from the range for `kind`
    pub async fn wait(&self, kind: DelayKind) -> Duration {
        wait(self.range_for(kind)).await
    }
}

/// Suspend the caller for a uniformly random duration in `range`
pub async fn wait(range: DelayRange) -> Duration {
    let delay = range.sample();
    if !delay.is_zero() {
        debug!("Waiting {}ms before continuing", delay.as_millis());
        tokio::time::sleep(delay).await;
    }
    delay
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_within_bounds() {
        let range = DelayRange::new(400, 1200);
        for _ in 0..200 {
            let ms = range.sample().as_millis() as u64;
            assert!((400..1200).contains(&ms), "{ms} outside [400, 1200)");
        }
    }

    #[test]
    fn test_sample_degenerate_ranges() {
        assert_eq!(DelayRange::ZERO.sample(), Duration::ZERO);
        assert_eq!(DelayRange::new(250, 250).sample(), Duration::from_millis(250));
        assert_eq!(DelayRange::new(300, 100).sample(), Duration::from_millis(300));
    }

    #[test]
    fn test_error_range_is_widest() {
        let policy = DelayPolicy::new(DelayConfig::default());
        let error = policy.range_for(DelayKind::Error);
        for kind in [
            DelayKind::Retry,
            DelayKind::CacheHit,
            DelayKind::PreDownload,
            DelayKind::NextDomain,
        ] {
            assert!(policy.range_for(kind).max_ms <= error.max_ms);
        }
    }

    #[tokio::test]
    async fn test_disabled_policy_does_not_sleep() {
        let policy = DelayPolicy::disabled();
        assert_eq!(policy.wait(DelayKind::Error).await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_sleeps_for_sampled_duration() {
        let start = tokio::time::Instant::now();
        let slept = wait(DelayRange::new(100, 101)).await;
        assert_eq!(slept, Duration::from_millis(100));
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
