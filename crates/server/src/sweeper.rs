use std::time::Duration;

use registry::SessionRegistry;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(30);
const MIN_SWEEP_PERIOD: Duration = Duration::from_secs(1);

/// Background task cancelling vetoes idle for longer than `max_idle`.
pub fn spawn_idle_sweeper(registry: SessionRegistry, max_idle: Duration) -> JoinHandle<()> {
    let period = max_idle.clamp(MIN_SWEEP_PERIOD, MAX_SWEEP_PERIOD);
    let max_idle = chrono::Duration::from_std(max_idle).unwrap_or(chrono::Duration::MAX);

    info!(
        max_idle_secs = max_idle.num_seconds(),
        period_secs = period.as_secs(),
        "Idle veto sweeper started"
    );

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let expired = registry.evict_idle(max_idle);
            if !expired.is_empty() {
                debug!(count = expired.len(), "Sweep expired idle vetoes");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_expires_idle_veto() {
        let registry = SessionRegistry::new();
        registry
            .start(1, ["haven", "bind", "ascent"], [10], [20], 1)
            .unwrap();

        let handle = spawn_idle_sweeper(registry.clone(), Duration::ZERO);
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(!registry.is_active(1));
        handle.abort();
    }
}
