//! The apply-weights job.
//!
//! Retries a single weight submission with doubling backoff until it
//! succeeds, the current epoch expires, or attempts are exhausted. Each
//! attempt re-reads hyperparameters and neurons at the current block so a
//! hyperparameter flip (e.g. commit-reveal toggled mid-retry) is honored on
//! the next try rather than baked in at job start.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use prometheus::{register_histogram_vec, HistogramVec};
use std::sync::OnceLock;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::chain::adapter::{ChainClient, ChainClientError};
use crate::chain::epoch::epoch_containing;
use crate::domain::{BlockNumber, CommitRevealVersion, Epoch, Hotkey, NetUid};

const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(120);
const DELAY_CAP_MULTIPLIER: u32 = 10;

fn job_duration_histogram() -> &'static HistogramVec {
    static H: OnceLock<HistogramVec> = OnceLock::new();
    H.get_or_init(|| {
        register_histogram_vec!(
            "pylon_apply_weights_job_duration_seconds",
            "Wall-clock duration of an apply-weights job",
            &["job_status", "netuid", "hotkey"]
        )
        .expect("pylon_apply_weights_job_duration_seconds registration")
    })
}

fn attempt_duration_histogram() -> &'static HistogramVec {
    static H: OnceLock<HistogramVec> = OnceLock::new();
    H.get_or_init(|| {
        register_histogram_vec!(
            "pylon_apply_weights_attempt_duration_seconds",
            "Wall-clock duration of a single apply-weights attempt",
            &["operation", "status", "netuid", "hotkey"]
        )
        .expect("pylon_apply_weights_attempt_duration_seconds registration")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Completed,
    TempoExpired,
    Failed,
}

impl JobStatus {
    fn label(self) -> &'static str {
        match self {
            JobStatus::Completed => "completed",
            JobStatus::TempoExpired => "tempo_expired",
            JobStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApplyWeightsError {
    #[error("current epoch {0:?} has already ended")]
    TempoExpired(Epoch),
    #[error("exhausted {0} attempts without success")]
    AttemptsExhausted(u32),
    #[error(transparent)]
    Chain(#[from] ChainClientError),
}

pub struct ApplyWeightsJob {
    client: Arc<dyn ChainClient>,
    netuid: NetUid,
    hotkey: Hotkey,
    weights_retry_attempts: u32,
    weights_retry_delay: Duration,
}

impl ApplyWeightsJob {
    pub fn new(
        client: Arc<dyn ChainClient>,
        netuid: NetUid,
        hotkey: Hotkey,
        weights_retry_attempts: u32,
        weights_retry_delay: Duration,
    ) -> Self {
        Self {
            client,
            netuid,
            hotkey,
            weights_retry_attempts,
            weights_retry_delay,
        }
    }

    /// Block indefinitely until a current block number can be read. Unlike
    /// the retry loop around it, this helper does not observe tempo
    /// expiry: knowing the current block is a prerequisite for even
    /// evaluating whether the tempo has expired.
    async fn get_current_block(&self) -> BlockNumber {
        let mut delay = self.weights_retry_delay;
        loop {
            match self.client.get_latest_block().await {
                Ok(block) => return block.number,
                Err(err) => {
                    warn!(error = %err, "failed to read current block, retrying indefinitely");
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(self.weights_retry_delay * DELAY_CAP_MULTIPLIER);
                }
            }
        }
    }

    pub async fn run(&self, weights: HashMap<Hotkey, f64>) -> Result<(), ApplyWeightsError> {
        let job_start = Instant::now();
        let current_block = self.get_current_block().await;
        let tempo = self.current_tempo(current_block).await;
        let initial_epoch = epoch_containing(current_block, self.netuid, tempo);

        let max_attempts = self.weights_retry_attempts + 1;
        let mut delay = self.weights_retry_delay;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            let attempt_start = Instant::now();
            let current_block = self.get_current_block().await;
            if current_block >= initial_epoch.end {
                self.observe_job(job_start, JobStatus::TempoExpired);
                return Err(ApplyWeightsError::TempoExpired(initial_epoch));
            }

            let result = timeout(ATTEMPT_TIMEOUT, self.apply_weights_once(&weights, current_block)).await;
            match result {
                Ok(Ok(())) => {
                    self.observe_attempt(attempt_start, "completed");
                    self.observe_job(job_start, JobStatus::Completed);
                    return Ok(());
                }
                Ok(Err(err)) => {
                    warn!(attempt, error = %err, "apply_weights attempt failed");
                    self.observe_attempt(attempt_start, "failed");
                    last_error = Some(ApplyWeightsError::Chain(err));
                }
                Err(_) => {
                    warn!(attempt, "apply_weights attempt timed out");
                    self.observe_attempt(attempt_start, "error");
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(self.weights_retry_delay * DELAY_CAP_MULTIPLIER);
            }
        }

        self.observe_job(job_start, JobStatus::Failed);
        error!(netuid = self.netuid, "apply_weights exhausted all attempts");
        Err(last_error.unwrap_or(ApplyWeightsError::AttemptsExhausted(max_attempts)))
    }

    async fn current_tempo(&self, block: BlockNumber) -> u16 {
        match self.client.get_hyperparams(self.netuid, Some(block)).await {
            Ok(Some(params)) => params.tempo.unwrap_or(360),
            _ => 360,
        }
    }

    async fn apply_weights_once(
        &self,
        weights: &HashMap<Hotkey, f64>,
        latest_block: BlockNumber,
    ) -> Result<(), ChainClientError> {
        let hyperparams = self
            .client
            .get_hyperparams(self.netuid, Some(latest_block))
            .await?;
        let commit_reveal_enabled = hyperparams
            .as_ref()
            .and_then(|h| h.commit_reveal_weights_enabled)
            .map(CommitRevealVersion::is_enabled)
            .unwrap_or(false);

        let neurons = self.client.get_neurons(self.netuid, Some(latest_block)).await?;
        let uid_weights = crate::chain::adapter::translate_weights_to_uids(weights, &neurons);

        if commit_reveal_enabled {
            self.client
                .commit_weights(self.netuid, uid_weights_to_hotkey_map(&uid_weights, &neurons))
                .await?;
        } else {
            self.client
                .set_weights(self.netuid, uid_weights_to_hotkey_map(&uid_weights, &neurons))
                .await?;
        }
        Ok(())
    }

    fn observe_job(&self, start: Instant, status: JobStatus) {
        job_duration_histogram()
            .with_label_values(&[status.label(), &self.netuid.to_string(), self.hotkey.as_str()])
            .observe(start.elapsed().as_secs_f64());
    }

    fn observe_attempt(&self, start: Instant, status: &str) {
        attempt_duration_histogram()
            .with_label_values(&["apply_weights", status, &self.netuid.to_string(), self.hotkey.as_str()])
            .observe(start.elapsed().as_secs_f64());
    }
}

/// `commit_weights`/`set_weights` both take hotkey-keyed maps; having just
/// translated to uids for missing-hotkey filtering, translate back so the
/// filtered set is what's actually submitted.
fn uid_weights_to_hotkey_map(
    uid_weights: &HashMap<u16, f64>,
    neurons: &[crate::domain::Neuron],
) -> HashMap<Hotkey, f64> {
    let by_uid: HashMap<u16, &Hotkey> = neurons.iter().map(|n| (n.uid, &n.hotkey)).collect();
    uid_weights
        .iter()
        .filter_map(|(uid, weight)| by_uid.get(uid).map(|hotkey| ((*hotkey).clone(), *weight)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockChainClient;
    use crate::domain::{AxonInfo, Block, BlockHash, Coldkey, Stakes, SubnetHyperparams, Tao};
    use std::net::{IpAddr, Ipv4Addr};

    fn neuron(uid: u16, hotkey: &str) -> crate::domain::Neuron {
        crate::domain::Neuron {
            uid,
            coldkey: Coldkey::from("5Cold"),
            hotkey: Hotkey::from(hotkey),
            active: true,
            axon_info: Some(AxonInfo {
                ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: 8091,
                protocol: crate::domain::AxonProtocol::Http,
            }),
            stake: Tao::from_rao(0),
            rank: 0.0,
            emission: Tao::from_rao(0),
            incentive: 0.0,
            consensus: 0.0,
            trust: 0.0,
            validator_trust: 0.0,
            dividends: 0.0,
            last_update: 0,
            validator_permit: false,
            pruning_score: 0,
            stakes: Stakes::default(),
        }
    }

    #[tokio::test]
    async fn submits_set_weights_when_commit_reveal_disabled() {
        let client = Arc::new(MockChainClient::new());
        client.open().await.unwrap();
        client
            .seed_block(Block {
                number: 100,
                hash: BlockHash::new("0xabc"),
            })
            .await;
        client.seed_neurons(1, vec![neuron(0, "a")]).await;
        client
            .seed_hyperparams(
                1,
                SubnetHyperparams {
                    tempo: Some(360),
                    commit_reveal_weights_enabled: Some(CommitRevealVersion::Disabled),
                    ..Default::default()
                },
            )
            .await;

        let job = ApplyWeightsJob::new(
            client.clone(),
            1,
            Hotkey::from("a"),
            3,
            Duration::from_millis(1),
        );
        let mut weights = HashMap::new();
        weights.insert(Hotkey::from("a"), 1.0);
        job.run(weights).await.unwrap();

        assert_eq!(client.set_weight_calls().await.len(), 1);
    }

    #[tokio::test]
    async fn exhausts_attempts_and_surfaces_the_last_chain_error() {
        let client = Arc::new(MockChainClient::new());
        client.open().await.unwrap();
        client
            .seed_block(Block {
                number: 10,
                hash: BlockHash::new("0xabc"),
            })
            .await;
        // No neurons or hyperparams seeded for this netuid -> every attempt fails
        // with SubnetNotFound, regardless of commit-reveal state.
        let job = ApplyWeightsJob::new(client, 99, Hotkey::from("a"), 1, Duration::from_millis(1));
        let mut weights = HashMap::new();
        weights.insert(Hotkey::from("a"), 1.0);
        let result = job.run(weights).await;
        assert!(matches!(
            result,
            Err(ApplyWeightsError::Chain(ChainClientError::SubnetNotFound(99)))
        ));
    }
}
