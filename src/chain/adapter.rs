//! The chain client adapter capability surface.
//!
//! A trait so the rest of the crate is polymorphic over the production
//! `subxt`-backed client (see [`crate::chain::subxt_client::SubxtChainClient`])
//! and the in-memory [`crate::chain::mock::MockChainClient`] used in tests,
//! mirroring `pylon/service/bittensor/client.py`'s `AbstractBittensorClient`.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::domain::{
    Block, BlockNumber, Hotkey, Metagraph, MetagraphInvariantError, NetUid, NeuronCertificate,
    NeuronCertificateKeypair, RevealRound, SubnetHyperparams,
};

/// Errors an adapter method can fail with. `UnknownBlock` is the signal the
/// archive-fallback wrapper watches for; it is not a transport failure.
#[derive(Debug, Error)]
pub enum ChainClientError {
    #[error("client is not open")]
    NotOpen,
    #[error("invalid state transition: {0}")]
    InvalidState(&'static str),
    #[error("block {0} is unknown to this client")]
    UnknownBlock(BlockNumber),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("chain rejected the call: {0}")]
    Dispatch(String),
    #[error("subnet {0} not found")]
    SubnetNotFound(NetUid),
    #[error(transparent)]
    InvalidMetagraph(#[from] MetagraphInvariantError),
}

pub type ChainResult<T> = std::result::Result<T, ChainClientError>;

/// A weight submission before hotkey→uid translation.
pub type WeightMap = HashMap<Hotkey, f64>;

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Scoped acquisition of the underlying connection. Calling `open` while
    /// already open fails with `InvalidState`.
    async fn open(&self) -> ChainResult<()>;

    /// Calling `close` while already closed fails with `InvalidState`.
    async fn close(&self) -> ChainResult<()>;

    async fn is_open(&self) -> bool;

    async fn get_block(&self, number: BlockNumber) -> ChainResult<Option<Block>>;

    async fn get_latest_block(&self) -> ChainResult<Block>;

    async fn get_neurons(
        &self,
        netuid: NetUid,
        block: Option<BlockNumber>,
    ) -> ChainResult<Vec<crate::domain::Neuron>>;

    async fn get_hyperparams(
        &self,
        netuid: NetUid,
        block: Option<BlockNumber>,
    ) -> ChainResult<Option<SubnetHyperparams>>;

    async fn get_certificates(
        &self,
        netuid: NetUid,
        block: Option<BlockNumber>,
    ) -> ChainResult<HashMap<Hotkey, NeuronCertificate>>;

    async fn get_certificate(
        &self,
        netuid: NetUid,
        hotkey: Option<&Hotkey>,
        block: Option<BlockNumber>,
    ) -> ChainResult<Option<NeuronCertificate>>;

    async fn generate_certificate_keypair(
        &self,
        netuid: NetUid,
        algorithm: crate::domain::CertificateAlgorithm,
    ) -> ChainResult<Option<NeuronCertificateKeypair>>;

    async fn commit_weights(&self, netuid: NetUid, weights: WeightMap)
        -> ChainResult<RevealRound>;

    async fn set_weights(&self, netuid: NetUid, weights: WeightMap) -> ChainResult<()>;

    async fn set_commitment(&self, netuid: NetUid, data: Vec<u8>) -> ChainResult<()>;

    async fn get_commitment(
        &self,
        netuid: NetUid,
        hotkey: &Hotkey,
        block: Option<BlockNumber>,
    ) -> ChainResult<Option<Vec<u8>>>;

    async fn get_commitments(
        &self,
        netuid: NetUid,
        block: Option<BlockNumber>,
    ) -> ChainResult<HashMap<Hotkey, Vec<u8>>>;

    /// Derived: `get_neurons` then index by hotkey. The default
    /// implementation is correct for every backend, so adapters only need to
    /// implement `get_neurons`.
    async fn get_metagraph(
        &self,
        netuid: NetUid,
        block: Option<BlockNumber>,
    ) -> ChainResult<Metagraph> {
        let neurons = self.get_neurons(netuid, block).await?;
        let resolved_block = match block {
            Some(number) => self
                .get_block(number)
                .await?
                .ok_or(ChainClientError::UnknownBlock(number))?,
            None => self.get_latest_block().await?,
        };
        Ok(Metagraph::new(resolved_block, neurons)?)
    }
}

/// Translate a hotkey-keyed weight map into uid-keyed weights against a
/// given neuron table, dropping and warning about hotkeys absent from it.
/// Shared by every adapter's `commit_weights`/`set_weights` implementation.
pub fn translate_weights_to_uids(
    weights: &WeightMap,
    neurons: &[crate::domain::Neuron],
) -> HashMap<u16, f64> {
    let by_hotkey: HashMap<&Hotkey, u16> = neurons.iter().map(|n| (&n.hotkey, n.uid)).collect();

    let mut missing = Vec::new();
    let mut uid_weights = HashMap::with_capacity(weights.len());
    for (hotkey, weight) in weights {
        match by_hotkey.get(hotkey) {
            Some(uid) => {
                uid_weights.insert(*uid, *weight);
            }
            None => missing.push(hotkey.clone()),
        }
    }

    if !missing.is_empty() {
        warn!(
            missing_hotkeys = ?missing,
            "dropping hotkeys absent from the neuron table before weight submission"
        );
    }

    uid_weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AxonInfo, Coldkey, Stakes, Tao};
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

    #[test]
    fn translate_drops_unknown_hotkeys() {
        let neurons = vec![neuron(0, "a"), neuron(1, "b")];
        let mut weights = WeightMap::new();
        weights.insert(Hotkey::from("a"), 0.5);
        weights.insert(Hotkey::from("ghost"), 0.5);

        let uids = translate_weights_to_uids(&weights, &neurons);
        assert_eq!(uids.len(), 1);
        assert_eq!(uids.get(&0), Some(&0.5));
    }
}
