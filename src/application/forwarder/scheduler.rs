use crate::application::forwarder::cycle::ForwardCycle;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs cycles strictly one after another on a fixed-rate ticker.
pub struct Scheduler {
    cycle: ForwardCycle,
    interval: Duration,
}

impl Scheduler {
    pub fn new(cycle: ForwardCycle, interval: Duration) -> Self {
        Self { cycle, interval }
    }

    pub fn cycle(&self) -> &ForwardCycle {
        &self.cycle
    }

    /// Loop until `shutdown` is cancelled; returns the number of cycles run.
    ///
    /// The first cycle starts immediately. Cancellation is observed before a
    /// cycle starts and while waiting for the next tick, never mid-cycle.
    pub async fn run(&self, shutdown: CancellationToken) -> u64 {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        let mut cycles = 0;
        loop {
            if shutdown.is_cancelled() {
                info!("shutdown requested, exiting gracefully...");
                return cycles;
            }

            self.cycle.run().await;
            cycles += 1;

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("shutdown during wait, exiting gracefully...");
                    return cycles;
                }
                _ = ticker.tick() => {}
            }
        }
    }
}
