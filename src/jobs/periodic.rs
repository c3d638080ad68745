//! Periodic background tasks sharing one cooperative-cancellation signal,
//! built on a broadcast-free `tokio::sync::Notify` so every task observes
//! the same stop signal without a channel per subscriber.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{info, warn};

use crate::cache::MetagraphCache;
use crate::chain::adapter::ChainClient;
use crate::domain::{BlockNumber, NetUid, SubnetHyperparams};

const METAGRAPH_REFRESH_INTERVAL: Duration = Duration::from_secs(10);
const HYPERPARAMS_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
const COMMIT_REVEAL_SCHEDULER_INTERVAL: Duration = Duration::from_secs(60);

/// Shared cooperative-cancellation handle for every periodic task.
#[derive(Clone, Default)]
pub struct StopSignal {
    notify: Arc<Notify>,
    stopped: Arc<std::sync::atomic::AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, std::sync::atomic::Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(std::sync::atomic::Ordering::SeqCst)
    }

    async fn wait_or_stop(&self, duration: Duration) -> bool {
        if self.is_stopped() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => self.is_stopped(),
            _ = self.notify.notified() => true,
        }
    }
}

/// Refreshes the metagraph cache for a subnet on a fixed interval.
pub async fn metagraph_refresh_task(
    client: Arc<dyn ChainClient>,
    cache: Arc<MetagraphCache>,
    netuid: NetUid,
    stop: StopSignal,
) {
    loop {
        if stop.is_stopped() {
            return;
        }
        match client.get_metagraph(netuid, None).await {
            Ok(metagraph) => {
                cache.insert(netuid, metagraph.block.number, metagraph).await;
            }
            Err(err) => warn!(netuid, error = %err, "metagraph refresh failed"),
        }
        if stop.wait_or_stop(METAGRAPH_REFRESH_INTERVAL).await {
            return;
        }
    }
}

/// Polls hyperparameters on a fixed interval, logging field-level
/// transitions so operators can see e.g. `commit_reveal_weights_enabled`
/// flip without diffing raw chain state themselves.
pub async fn hyperparams_refresh_task(
    client: Arc<dyn ChainClient>,
    netuid: NetUid,
    stop: StopSignal,
) {
    let mut previous: Option<SubnetHyperparams> = None;
    loop {
        if stop.is_stopped() {
            return;
        }
        match client.get_hyperparams(netuid, None).await {
            Ok(Some(current)) => {
                if let Some(prev) = &previous {
                    for (field, old, new) in prev.diff(&current) {
                        info!(netuid, field, old, new, "hyperparameter changed");
                    }
                }
                previous = Some(current);
            }
            Ok(None) => warn!(netuid, "hyperparameters not observed"),
            Err(err) => warn!(netuid, error = %err, "hyperparams refresh failed"),
        }
        if stop.wait_or_stop(HYPERPARAMS_REFRESH_INTERVAL).await {
            return;
        }
    }
}

/// Drives commit-reveal submissions on a fixed interval: once per subnet
/// cycle, inside the commit window, fires an apply-weights job.
pub struct CommitRevealScheduler {
    client: Arc<dyn ChainClient>,
    netuid: NetUid,
    commit_cycle_length: u64,
    commit_window_start_offset: u64,
    commit_window_end_buffer: u64,
    last_commit_block: std::sync::atomic::AtomicU64,
}

impl CommitRevealScheduler {
    pub fn new(
        client: Arc<dyn ChainClient>,
        netuid: NetUid,
        commit_cycle_length: u64,
        commit_window_start_offset: u64,
        commit_window_end_buffer: u64,
    ) -> Self {
        Self {
            client,
            netuid,
            commit_cycle_length,
            commit_window_start_offset,
            commit_window_end_buffer,
            last_commit_block: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// `commit_window = [T + start_offset, (T + tempo) - end_buffer)`, where
    /// `T` is the current epoch's start. Returns `Some(epoch_start)` when the
    /// scheduler should fire: `(current - last) >= cycle_length * tempo` and
    /// `current` falls inside the window.
    fn should_commit(&self, current: BlockNumber, tempo: u16, epoch_start: BlockNumber) -> bool {
        let last = self.last_commit_block.load(std::sync::atomic::Ordering::SeqCst);
        let due = current.saturating_sub(last) >= self.commit_cycle_length * tempo as u64;
        let window_start = epoch_start + self.commit_window_start_offset;
        let window_end = (epoch_start + tempo as u64).saturating_sub(self.commit_window_end_buffer);
        due && current >= window_start && current < window_end
    }

    pub async fn run_once(&self) -> Option<BlockNumber> {
        let block = self.client.get_latest_block().await.ok()?;
        let hyperparams = self.client.get_hyperparams(self.netuid, None).await.ok()??;
        let tempo = hyperparams.tempo?;
        let epoch = crate::chain::epoch::epoch_containing(block.number, self.netuid, tempo);

        if self.should_commit(block.number, tempo, epoch.start) {
            self.last_commit_block
                .store(block.number, std::sync::atomic::Ordering::SeqCst);
            return Some(epoch.start);
        }
        None
    }

    pub async fn task(self: Arc<Self>, stop: StopSignal) {
        loop {
            if stop.is_stopped() {
                return;
            }
            if let Some(epoch_start) = self.run_once().await {
                info!(netuid = self.netuid, epoch_start, "commit window reached");
            }
            if stop.wait_or_stop(COMMIT_REVEAL_SCHEDULER_INTERVAL).await {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockChainClient;

    fn scheduler() -> CommitRevealScheduler {
        CommitRevealScheduler::new(Arc::new(MockChainClient::new()), 1, 3, 180, 10)
    }

    #[test]
    fn window_excludes_blocks_before_start_offset() {
        let s = scheduler();
        assert!(!s.should_commit(100, 360, 0));
    }

    #[test]
    fn window_includes_blocks_inside_offsets() {
        let s = scheduler();
        // epoch_start=0, tempo=360: window = [180, 350)
        assert!(s.should_commit(200, 360, 0));
    }

    #[test]
    fn window_excludes_blocks_after_end_buffer() {
        let s = scheduler();
        assert!(!s.should_commit(355, 360, 0));
    }

    #[test]
    fn cycle_length_suppresses_repeat_commits_within_the_window() {
        let s = scheduler();
        assert!(s.should_commit(200, 360, 0));
        s.last_commit_block.store(200, std::sync::atomic::Ordering::SeqCst);
        // Next block still inside the window but cycle_length*tempo hasn't elapsed.
        assert!(!s.should_commit(210, 360, 0));
    }
}
