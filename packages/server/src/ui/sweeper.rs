//! Liveness Sweeper
//!
//! 一定間隔でディスパッチャにスイープ要求を送ります。
//! 切断の検知はこのスイープだけで行われます（close イベントでは Registry を更新しない）。

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::dispatcher::DispatcherHandle;

/// Default period between two sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5);

pub struct LivenessSweeper {
    interval: Duration,
    dispatcher: DispatcherHandle,
}

impl LivenessSweeper {
    pub fn new(interval: Duration, dispatcher: DispatcherHandle) -> Self {
        Self {
            interval,
            dispatcher,
        }
    }

    /// Request a sweep every `interval` until cancelled.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::debug!("Liveness sweeper started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if !self.dispatcher.request_sweep() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Liveness sweeper stopped");
    }
}
