//! Cancellable timers for the progress simulation.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Owner-side handle that stops every timer and task tied to an uploader.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub(crate) fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Repeating timer. The first tick fires one full period after creation.
pub struct Ticker {
    interval: Interval,
    token: CancellationToken,
    ticks: u32,
}

impl Ticker {
    pub fn new(period: Duration, token: CancellationToken) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            token,
            ticks: 0,
        }
    }

    /// Wait for the next tick. Returns its 1-based number, or `None` once
    /// cancelled.
    pub async fn tick(&mut self) -> Option<u32> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            _ = self.interval.tick() => {
                self.ticks += 1;
                Some(self.ticks)
            }
        }
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Stop ticking for good. Consumes the timer so no further tick can be awaited.
    pub fn stop(self) -> u32 {
        self.ticks
    }
}

/// One-shot delay. Returns `false` if cancelled before it elapsed.
pub async fn delay(duration: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
