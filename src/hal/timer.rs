//! Timer Abstractions
//!
//! The fixed-rate tick source and a rate limiter for slow peripheral work.

use embassy_time::{Duration, Instant, Ticker, Timer};

use crate::config::TICK_HZ;

/// Fixed-rate tick source
///
/// Missed ticks are caught up by the `Ticker`, so the rig's tick count
/// tracks wall time even if one pass runs long.
pub struct TickSource {
    ticker: Ticker,
}

impl TickSource {
    /// Ticker at [`TICK_HZ`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            ticker: Ticker::every(Self::period()),
        }
    }

    /// Period of one tick
    #[must_use]
    pub const fn period() -> Duration {
        Duration::from_hz(TICK_HZ as u64)
    }

    /// Wait for the next tick
    pub async fn next(&mut self) {
        self.ticker.next().await;
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Rate limiter for periodic operations
pub struct RateLimiter {
    period: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    /// Create a rate limiter from period
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    /// Create a rate limiter from milliseconds
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Check if enough time has passed (and update if so)
    pub fn check(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now - last < self.period => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Wait out an EEPROM internal write cycle
pub async fn write_cycle() {
    Timer::after(Duration::from_millis(5)).await;
}
