//! In-memory [`ChainClient`] test double, grounded in the request layer's
//! mock transport pattern (`WorkNormally`/`RaiseRequestError` style
//! behaviors) but scoped to the chain adapter surface.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::chain::adapter::{ChainClient, ChainClientError, ChainResult, WeightMap};
use crate::domain::{
    Block, BlockHash, BlockNumber, CertificateAlgorithm, Hotkey, NetUid, Neuron,
    NeuronCertificate, NeuronCertificateKeypair, RevealRound, SubnetHyperparams,
};

#[derive(Default)]
struct State {
    open: bool,
    blocks: HashMap<BlockNumber, Block>,
    latest: Option<Block>,
    neurons: HashMap<NetUid, Vec<Neuron>>,
    hyperparams: HashMap<NetUid, SubnetHyperparams>,
    certificates: HashMap<NetUid, HashMap<Hotkey, NeuronCertificate>>,
    commitments: HashMap<NetUid, HashMap<Hotkey, Vec<u8>>>,
    committed_weights: HashMap<NetUid, WeightMap>,
    set_weight_calls: Vec<(NetUid, WeightMap)>,
}

/// A fully in-process [`ChainClient`] used by adapter, archive, pool, job
/// and scheduler tests. Every method here fails with `NotOpen` until
/// `open()` has been called, matching the real adapter's contract.
pub struct MockChainClient {
    state: RwLock<State>,
    next_reveal_round: RevealRound,
}

impl MockChainClient {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            next_reveal_round: 1,
        }
    }

    pub async fn seed_block(&self, block: Block) {
        let mut state = self.state.write().await;
        state.blocks.insert(block.number, block.clone());
        state.latest = Some(block);
    }

    pub async fn seed_neurons(&self, netuid: NetUid, neurons: Vec<Neuron>) {
        self.state.write().await.neurons.insert(netuid, neurons);
    }

    pub async fn seed_hyperparams(&self, netuid: NetUid, params: SubnetHyperparams) {
        self.state.write().await.hyperparams.insert(netuid, params);
    }

    pub async fn set_weight_calls(&self) -> Vec<(NetUid, WeightMap)> {
        self.state.read().await.set_weight_calls.clone()
    }
}

impl Default for MockChainClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn open(&self) -> ChainResult<()> {
        let mut state = self.state.write().await;
        if state.open {
            return Err(ChainClientError::InvalidState("already open"));
        }
        state.open = true;
        Ok(())
    }

    async fn close(&self) -> ChainResult<()> {
        let mut state = self.state.write().await;
        if !state.open {
            return Err(ChainClientError::InvalidState("already closed"));
        }
        state.open = false;
        Ok(())
    }

    async fn is_open(&self) -> bool {
        self.state.read().await.open
    }

    async fn get_block(&self, number: BlockNumber) -> ChainResult<Option<Block>> {
        let state = self.state.read().await;
        if !state.open {
            return Err(ChainClientError::NotOpen);
        }
        Ok(state.blocks.get(&number).cloned())
    }

    async fn get_latest_block(&self) -> ChainResult<Block> {
        let state = self.state.read().await;
        if !state.open {
            return Err(ChainClientError::NotOpen);
        }
        state
            .latest
            .clone()
            .ok_or(ChainClientError::Transport("no latest block seeded".into()))
    }

    async fn get_neurons(
        &self,
        netuid: NetUid,
        _block: Option<BlockNumber>,
    ) -> ChainResult<Vec<Neuron>> {
        let state = self.state.read().await;
        if !state.open {
            return Err(ChainClientError::NotOpen);
        }
        state
            .neurons
            .get(&netuid)
            .cloned()
            .ok_or(ChainClientError::SubnetNotFound(netuid))
    }

    async fn get_hyperparams(
        &self,
        netuid: NetUid,
        _block: Option<BlockNumber>,
    ) -> ChainResult<Option<SubnetHyperparams>> {
        let state = self.state.read().await;
        if !state.open {
            return Err(ChainClientError::NotOpen);
        }
        Ok(state.hyperparams.get(&netuid).cloned())
    }

    async fn get_certificates(
        &self,
        netuid: NetUid,
        _block: Option<BlockNumber>,
    ) -> ChainResult<HashMap<Hotkey, NeuronCertificate>> {
        let state = self.state.read().await;
        if !state.open {
            return Err(ChainClientError::NotOpen);
        }
        Ok(state.certificates.get(&netuid).cloned().unwrap_or_default())
    }

    async fn get_certificate(
        &self,
        netuid: NetUid,
        hotkey: Option<&Hotkey>,
        block: Option<BlockNumber>,
    ) -> ChainResult<Option<NeuronCertificate>> {
        let certs = self.get_certificates(netuid, block).await?;
        Ok(hotkey.and_then(|h| certs.get(h).cloned()))
    }

    async fn generate_certificate_keypair(
        &self,
        _netuid: NetUid,
        algorithm: CertificateAlgorithm,
    ) -> ChainResult<Option<NeuronCertificateKeypair>> {
        if !self.state.read().await.open {
            return Err(ChainClientError::NotOpen);
        }
        if !matches!(algorithm, CertificateAlgorithm::Ed25519) {
            return Ok(None);
        }
        Ok(Some(NeuronCertificateKeypair {
            algorithm,
            public_key: vec![1; 32],
            private_key: vec![2; 32],
        }))
    }

    async fn commit_weights(
        &self,
        netuid: NetUid,
        weights: WeightMap,
    ) -> ChainResult<RevealRound> {
        let mut state = self.state.write().await;
        if !state.open {
            return Err(ChainClientError::NotOpen);
        }
        state.committed_weights.insert(netuid, weights);
        Ok(self.next_reveal_round)
    }

    async fn set_weights(&self, netuid: NetUid, weights: WeightMap) -> ChainResult<()> {
        let mut state = self.state.write().await;
        if !state.open {
            return Err(ChainClientError::NotOpen);
        }
        state.set_weight_calls.push((netuid, weights));
        Ok(())
    }

    async fn set_commitment(&self, netuid: NetUid, data: Vec<u8>) -> ChainResult<()> {
        let mut state = self.state.write().await;
        if !state.open {
            return Err(ChainClientError::NotOpen);
        }
        let hotkey = Hotkey::from("self");
        state
            .commitments
            .entry(netuid)
            .or_default()
            .insert(hotkey, data);
        Ok(())
    }

    async fn get_commitment(
        &self,
        netuid: NetUid,
        hotkey: &Hotkey,
        _block: Option<BlockNumber>,
    ) -> ChainResult<Option<Vec<u8>>> {
        let state = self.state.read().await;
        if !state.open {
            return Err(ChainClientError::NotOpen);
        }
        Ok(state
            .commitments
            .get(&netuid)
            .and_then(|m| m.get(hotkey))
            .cloned())
    }

    async fn get_commitments(
        &self,
        netuid: NetUid,
        _block: Option<BlockNumber>,
    ) -> ChainResult<HashMap<Hotkey, Vec<u8>>> {
        let state = self.state.read().await;
        if !state.open {
            return Err(ChainClientError::NotOpen);
        }
        Ok(state.commitments.get(&netuid).cloned().unwrap_or_default())
    }
}

pub type SharedMockChainClient = Arc<MockChainClient>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AxonInfo, BlockHash as BH, Coldkey, Stakes, Tao};
    use std::net::{IpAddr, Ipv4Addr};

    fn neuron(uid: u16, hotkey: &str) -> Neuron {
        Neuron {
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
    async fn operations_fail_before_open() {
        let client = MockChainClient::new();
        assert!(matches!(
            client.get_latest_block().await,
            Err(ChainClientError::NotOpen)
        ));
    }

    #[tokio::test]
    async fn double_open_is_invalid_state() {
        let client = MockChainClient::new();
        client.open().await.unwrap();
        assert!(matches!(
            client.open().await,
            Err(ChainClientError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn get_neurons_roundtrips_seeded_data() {
        let client = MockChainClient::new();
        client.open().await.unwrap();
        client
            .seed_block(Block {
                number: 1,
                hash: BH::new("0xabc"),
            })
            .await;
        client.seed_neurons(1, vec![neuron(0, "a")]).await;

        let neurons = client.get_neurons(1, None).await.unwrap();
        assert_eq!(neurons.len(), 1);
        assert_eq!(neurons[0].hotkey.as_str(), "a");
    }

    #[tokio::test]
    async fn unseeded_subnet_is_not_found() {
        let client = MockChainClient::new();
        client.open().await.unwrap();
        assert!(matches!(
            client.get_neurons(99, None).await,
            Err(ChainClientError::SubnetNotFound(99))
        ));
    }
}
