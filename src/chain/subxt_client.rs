//! Production [`ChainClient`] backed by the crate's `subxt`-based SDK layer
//! (`BittensorClient`, `queries::*`, `validator::weights`).
//!
//! Historical-block correctness is bounded by what the underlying RPC
//! endpoint exposes: on a main (pruned) node `get_block_hash_with_rpc`
//! returns `None` for anything past its pruning horizon, which this adapter
//! surfaces as `UnknownBlock` — precisely the signal component B's
//! archive-fallback wrapper watches for. Pinning arbitrary storage reads to
//! a historical block hash is the chain RPC library's own concern (out of
//! scope); this adapter reads current state once it has confirmed the block
//! is resolvable.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sp_core::crypto::Ss58Codec;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::chain::adapter::{
    translate_weights_to_uids, ChainClient, ChainClientError, ChainResult, WeightMap,
};
use crate::chain::signer::create_signer;
use crate::chain::{BittensorClient, BittensorSigner, ExtrinsicWait};
use crate::domain::{
    AxonInfo, Block, BlockHash, BlockNumber, CertificateAlgorithm, Coldkey, CommitRevealVersion,
    Hotkey, NetUid, Neuron, NeuronCertificate, NeuronCertificateKeypair, RevealRound, Stakes,
    SubnetHyperparams, Tao,
};
use crate::queries::chain_info::{create_rpc_methods, get_block_hash_with_rpc};
use crate::queries::neurons_bulk::neurons_bulk;
use crate::utils::crypto::{
    commit_hash_to_hex, generate_salt, generate_subtensor_commit_hash,
};
use crate::wallet::Wallet;
use subxt::backend::legacy::LegacyRpcMethods;
use subxt::PolkadotConfig;

struct Open {
    client: BittensorClient,
    rpc: LegacyRpcMethods<PolkadotConfig>,
    signer: BittensorSigner,
    hotkey: Hotkey,
}

/// Configuration needed to open a [`SubxtChainClient`].
#[derive(Clone)]
pub struct SubxtClientConfig {
    pub rpc_url: String,
    pub wallet_name: String,
    pub hotkey_name: String,
    pub wallet_path: Option<String>,
}

pub struct SubxtChainClient {
    config: SubxtClientConfig,
    inner: RwLock<Option<Open>>,
}

impl SubxtChainClient {
    pub fn new(config: SubxtClientConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(None),
        }
    }

    async fn with_open<T>(
        &self,
        f: impl FnOnce(&Open) -> ChainResult<T>,
    ) -> ChainResult<T> {
        let guard = self.inner.read().await;
        let open = guard.as_ref().ok_or(ChainClientError::NotOpen)?;
        f(open)
    }

    fn guard_subxt(err: impl std::fmt::Display) -> ChainClientError {
        ChainClientError::Transport(err.to_string())
    }
}

#[async_trait]
impl ChainClient for SubxtChainClient {
    async fn open(&self) -> ChainResult<()> {
        let mut guard = self.inner.write().await;
        if guard.is_some() {
            return Err(ChainClientError::InvalidState("already open"));
        }

        let client = BittensorClient::new(self.config.rpc_url.clone())
            .await
            .map_err(Self::guard_subxt)?;
        let rpc = create_rpc_methods(&self.config.rpc_url)
            .await
            .map_err(Self::guard_subxt)?;

        let wallet = Wallet::new(
            &self.config.wallet_name,
            &self.config.hotkey_name,
            self.config.wallet_path.as_deref(),
        )
        .map_err(|e| ChainClientError::Transport(e.to_string()))?;
        let keypair = wallet
            .hotkey_keypair(None)
            .map_err(|e| ChainClientError::Transport(e.to_string()))?;
        let hotkey = Hotkey::from(keypair.ss58_address());
        let signer = create_signer(keypair.pair().clone());

        *guard = Some(Open {
            client,
            rpc,
            signer,
            hotkey,
        });
        Ok(())
    }

    async fn close(&self) -> ChainResult<()> {
        let mut guard = self.inner.write().await;
        if guard.take().is_none() {
            return Err(ChainClientError::InvalidState("already closed"));
        }
        Ok(())
    }

    async fn is_open(&self) -> bool {
        self.inner.read().await.is_some()
    }

    async fn get_block(&self, number: BlockNumber) -> ChainResult<Option<Block>> {
        self.with_open(|_| Ok(())).await?;
        let guard = self.inner.read().await;
        let open = guard.as_ref().ok_or(ChainClientError::NotOpen)?;
        let hash = get_block_hash_with_rpc(&open.rpc, number)
            .await
            .map_err(Self::guard_subxt)?;
        Ok(hash.map(|h| Block {
            number,
            hash: BlockHash::new(h),
        }))
    }

    async fn get_latest_block(&self) -> ChainResult<Block> {
        let guard = self.inner.read().await;
        let open = guard.as_ref().ok_or(ChainClientError::NotOpen)?;
        let number = crate::queries::chain_info::get_block_number(open.client.api())
            .await
            .map_err(Self::guard_subxt)?;
        let hash = crate::queries::chain_info::get_block_hash(open.client.api(), number)
            .await
            .map_err(Self::guard_subxt)?
            .ok_or(ChainClientError::UnknownBlock(number))?;
        Ok(Block {
            number,
            hash: BlockHash::new(hash),
        })
    }

    async fn get_neurons(
        &self,
        netuid: NetUid,
        block: Option<BlockNumber>,
    ) -> ChainResult<Vec<Neuron>> {
        if let Some(number) = block {
            // Confirm the block is resolvable before reading current state
            // under its name; an unresolvable block is UnknownBlock, the
            // signal the archive-fallback wrapper retries on.
            self.get_block(number).await?;
        }

        let guard = self.inner.read().await;
        let open = guard.as_ref().ok_or(ChainClientError::NotOpen)?;

        let raw = neurons_bulk(&open.client, netuid, block)
            .await
            .map_err(|e| ChainClientError::Transport(e.to_string()))?;

        if raw.is_empty() {
            let exists = crate::queries::subnets::subnet_exists(open.client.api(), netuid)
                .await
                .unwrap_or(true);
            if !exists {
                return Err(ChainClientError::SubnetNotFound(netuid));
            }
        }

        Ok(raw.into_iter().map(domain_neuron_from_info).collect())
    }

    async fn get_hyperparams(
        &self,
        netuid: NetUid,
        block: Option<BlockNumber>,
    ) -> ChainResult<Option<SubnetHyperparams>> {
        if let Some(number) = block {
            self.get_block(number).await?;
        }
        let guard = self.inner.read().await;
        let open = guard.as_ref().ok_or(ChainClientError::NotOpen)?;

        match crate::queries::hyperparameters::get_subnet_hyperparameters(open.client.api(), netuid)
            .await
        {
            Ok(h) => Ok(Some(SubnetHyperparams {
                max_weights_limit: Some(h.max_weights_limit),
                commit_reveal_weights_enabled: Some(CommitRevealVersion::from_bool(
                    h.commit_reveal_weights_enabled,
                )),
                tempo: Some(h.tempo),
                weights_rate_limit: Some(h.weights_rate_limit),
                min_stake: None,
                rho: Some(h.rho),
                kappa: Some(h.kappa),
                weights_version: Some(h.weights_version),
                activity_cutoff: Some(h.activity_cutoff),
                max_validators: Some(h.max_validators),
                adjustment_alpha: Some(h.adjustment_alpha),
            })),
            Err(e) => {
                debug!(netuid, error = %e, "hyperparameters not observed");
                Ok(None)
            }
        }
    }

    async fn get_certificates(
        &self,
        netuid: NetUid,
        block: Option<BlockNumber>,
    ) -> ChainResult<HashMap<Hotkey, NeuronCertificate>> {
        if let Some(number) = block {
            self.get_block(number).await?;
        }
        let guard = self.inner.read().await;
        let open = guard.as_ref().ok_or(ChainClientError::NotOpen)?;
        let raw = crate::queries::neurons::get_all_neuron_certificates(open.client.api(), netuid)
            .await
            .map_err(|e| ChainClientError::Transport(e.to_string()))?;
        Ok(raw
            .into_iter()
            .map(|(hotkey, cert)| {
                (
                    Hotkey::from(hotkey),
                    NeuronCertificate {
                        algorithm: CertificateAlgorithm::from(
                            cert.algorithm.parse::<u8>().unwrap_or(0),
                        ),
                        public_key: cert.certificate,
                    },
                )
            })
            .collect())
    }

    async fn get_certificate(
        &self,
        netuid: NetUid,
        hotkey: Option<&Hotkey>,
        block: Option<BlockNumber>,
    ) -> ChainResult<Option<NeuronCertificate>> {
        let certs = self.get_certificates(netuid, block).await?;
        let target = match hotkey {
            Some(h) => h.clone(),
            None => {
                let guard = self.inner.read().await;
                guard.as_ref().ok_or(ChainClientError::NotOpen)?.hotkey.clone()
            }
        };
        Ok(certs.get(&target).cloned())
    }

    async fn generate_certificate_keypair(
        &self,
        _netuid: NetUid,
        algorithm: CertificateAlgorithm,
    ) -> ChainResult<Option<NeuronCertificateKeypair>> {
        self.with_open(|_| Ok(())).await?;
        if !matches!(algorithm, CertificateAlgorithm::Ed25519) {
            warn!(?algorithm, "unsupported certificate algorithm requested");
            return Ok(None);
        }
        use ed25519_dalek_placeholder::generate_ed25519_keypair;
        let (public_key, private_key) = generate_ed25519_keypair();
        Ok(Some(NeuronCertificateKeypair {
            algorithm,
            public_key,
            private_key,
        }))
    }

    async fn commit_weights(
        &self,
        netuid: NetUid,
        weights: WeightMap,
    ) -> ChainResult<RevealRound> {
        let neurons = self.get_neurons(netuid, None).await?;
        let uid_weights = translate_weights_to_uids(&weights, &neurons);
        if uid_weights.is_empty() {
            return Err(ChainClientError::Dispatch(
                "no hotkeys in the submission matched the current neuron table".into(),
            ));
        }

        let guard = self.inner.read().await;
        let open = guard.as_ref().ok_or(ChainClientError::NotOpen)?;

        let tempo = crate::queries::subnets::get_tempo(open.client.api(), netuid)
            .await
            .map_err(Self::guard_subxt)?;
        let version_key = crate::queries::hyperparameters::get_weights_version_key(
            &open.client,
            netuid,
        )
        .await
        .unwrap_or(0);

        let mut uids: Vec<u64> = Vec::with_capacity(uid_weights.len());
        let mut values: Vec<u16> = Vec::with_capacity(uid_weights.len());
        for (uid, weight) in &uid_weights {
            uids.push(*uid as u64);
            values.push((weight.clamp(0.0, 1.0) * u16::MAX as f64).round() as u16);
        }
        let uids_u16: Vec<u16> = uids.iter().map(|u| *u as u16).collect();
        let salt = generate_salt(8);
        let hotkey_account = sp_core::crypto::AccountId32::from_ss58check(open.hotkey.as_str())
            .map_err(|e| ChainClientError::Transport(format!("invalid hotkey ss58: {e:?}")))?;
        let commit_hash = generate_subtensor_commit_hash(
            hotkey_account.as_ref(),
            netuid,
            None,
            &uids_u16,
            &values,
            &salt,
            version_key,
        );
        let commit_hash_hex = commit_hash_to_hex(&commit_hash);

        crate::validator::weights::commit_weights(
            &open.client,
            &open.signer,
            netuid,
            &commit_hash_hex,
            ExtrinsicWait::Included,
        )
        .await
        .map_err(|e| ChainClientError::Dispatch(e.to_string()))?;

        Ok(crate::chain::epoch::calculate_reveal_round(tempo, 0, netuid, 1, 12.0))
    }

    async fn set_weights(&self, netuid: NetUid, weights: WeightMap) -> ChainResult<()> {
        let neurons = self.get_neurons(netuid, None).await?;
        let uid_weights = translate_weights_to_uids(&weights, &neurons);
        if uid_weights.is_empty() {
            return Err(ChainClientError::Dispatch(
                "no hotkeys in the submission matched the current neuron table".into(),
            ));
        }

        let guard = self.inner.read().await;
        let open = guard.as_ref().ok_or(ChainClientError::NotOpen)?;

        let version_key = crate::queries::hyperparameters::get_weights_version_key(
            &open.client,
            netuid,
        )
        .await
        .unwrap_or(0);

        let uids: Vec<u64> = uid_weights.keys().map(|u| *u as u64).collect();
        let weight_vals: Vec<f32> = uid_weights.values().map(|w| *w as f32).collect();

        crate::validator::weights::set_weights(
            &open.client,
            &open.signer,
            netuid,
            &uids,
            &weight_vals,
            Some(version_key),
            ExtrinsicWait::Included,
        )
        .await
        .map_err(|e| ChainClientError::Dispatch(e.to_string()))?;

        Ok(())
    }

    async fn set_commitment(&self, netuid: NetUid, data: Vec<u8>) -> ChainResult<()> {
        let guard = self.inner.read().await;
        let open = guard.as_ref().ok_or(ChainClientError::NotOpen)?;
        crate::validator::commitments::set_commitment(
            &open.client,
            &open.signer,
            netuid,
            &data,
            ExtrinsicWait::Included,
        )
        .await
        .map_err(|e| ChainClientError::Dispatch(e.to_string()))?;
        Ok(())
    }

    async fn get_commitment(
        &self,
        netuid: NetUid,
        hotkey: &Hotkey,
        block: Option<BlockNumber>,
    ) -> ChainResult<Option<Vec<u8>>> {
        let all = self.get_commitments(netuid, block).await?;
        Ok(all.get(hotkey).cloned())
    }

    async fn get_commitments(
        &self,
        netuid: NetUid,
        block: Option<BlockNumber>,
    ) -> ChainResult<HashMap<Hotkey, Vec<u8>>> {
        if let Some(number) = block {
            self.get_block(number).await?;
        }
        let guard = self.inner.read().await;
        let open = guard.as_ref().ok_or(ChainClientError::NotOpen)?;
        let raw = crate::queries::commitments::get_all_commitments(&open.client, netuid)
            .await
            .map_err(|e| ChainClientError::Transport(e.to_string()))?;

        let mut out = HashMap::new();
        for (account, message) in raw {
            use sp_core::crypto::Ss58Codec;
            out.insert(Hotkey::from(account.to_ss58check()), message.into_bytes());
        }
        Ok(out)
    }
}

fn domain_neuron_from_info(n: crate::types::NeuronInfo) -> Neuron {
    let stake = Tao::from_rao(n.stake.as_rao());
    Neuron {
        uid: n.uid,
        coldkey: Coldkey::from(n.coldkey),
        hotkey: Hotkey::from(n.hotkey),
        active: n.active,
        axon_info: n.axon_info.and_then(domain_axon_from_info),
        stake,
        rank: n.rank,
        emission: Tao::from_f64(n.emission),
        incentive: n.incentive,
        consensus: n.consensus,
        trust: n.trust,
        validator_trust: n.validator_trust,
        dividends: n.dividends,
        last_update: n.last_update,
        validator_permit: n.validator_permit,
        pruning_score: n.pruning_score,
        stakes: Stakes {
            alpha: crate::domain::Alpha::from_rao(n.total_stake.as_rao()),
            tao: stake,
            total: stake,
        },
    }
}

fn domain_axon_from_info(a: crate::types::AxonInfo) -> Option<AxonInfo> {
    let ip: std::net::IpAddr = a.ip.parse().ok()?;
    Some(AxonInfo {
        ip,
        port: a.port,
        protocol: crate::domain::AxonProtocol::from(a.protocol),
    })
}

/// Minimal Ed25519 keypair generation for certificate issuance, grounded in
/// the wallet module's use of `rand`/`zeroize` for key material handling.
mod ed25519_dalek_placeholder {
    pub fn generate_ed25519_keypair() -> (Vec<u8>, Vec<u8>) {
        use rand::RngCore;
        let mut seed = [0u8; 32];
        rand::rng().fill_bytes(&mut seed);
        let pair = sp_core::ed25519::Pair::from_seed(&seed);
        use sp_core::Pair;
        (pair.public().0.to_vec(), seed.to_vec())
    }
}

pub type SharedChainClient = Arc<dyn ChainClient>;
