//! Core data model: identifiers, chain snapshots, and the neuron table.
//!
//! Mirrors the shapes in `queries::neurons`/`queries::hyperparameters` and the
//! Python service's `pylon/service/bittensor/models.py`, collapsed into a
//! single typed model shared by the chain adapter, the cache, and the HTTP
//! surface.

mod money;

pub use money::{Alpha, Tao};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;

/// SS58 address of a neuron's signing key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hotkey(pub String);

/// SS58 address of the key that owns a neuron's stake.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coldkey(pub String);

macro_rules! ss58_newtype {
    ($ty:ident) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $ty {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $ty {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

ss58_newtype!(Hotkey);
ss58_newtype!(Coldkey);

/// Hex-encoded block hash, optionally `0x`-prefixed (both forms accepted on input).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHash(pub String);

impl BlockHash {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.starts_with("0x") {
            Self(raw)
        } else {
            Self(format!("0x{raw}"))
        }
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type BlockNumber = u64;
pub type NetUid = u16;
pub type RevealRound = u64;
pub type Timestamp = u64;
pub type PruningScore = u16;

/// A single chain block identified by number and hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub number: BlockNumber,
    pub hash: BlockHash,
}

/// Transport protocol advertised by a served axon, as encoded on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxonProtocol {
    Tcp,
    Udp,
    Http,
    Unknown(u8),
}

impl From<u8> for AxonProtocol {
    fn from(v: u8) -> Self {
        match v {
            0 => AxonProtocol::Tcp,
            1 => AxonProtocol::Udp,
            4 => AxonProtocol::Http,
            n => AxonProtocol::Unknown(n),
        }
    }
}

impl From<AxonProtocol> for u8 {
    fn from(p: AxonProtocol) -> u8 {
        match p {
            AxonProtocol::Tcp => 0,
            AxonProtocol::Udp => 1,
            AxonProtocol::Http => 4,
            AxonProtocol::Unknown(n) => n,
        }
    }
}

/// Network address a neuron has advertised for serving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxonInfo {
    pub ip: IpAddr,
    pub port: u16,
    pub protocol: AxonProtocol,
}

/// Stake broken down by denomination, in fixed-point `Tao`/`Alpha` units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stakes {
    pub alpha: Alpha,
    pub tao: Tao,
    pub total: Tao,
}

/// A single participant in a subnet's neuron table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
    pub uid: u16,
    pub coldkey: Coldkey,
    pub hotkey: Hotkey,
    pub active: bool,
    pub axon_info: Option<AxonInfo>,
    pub stake: Tao,
    pub rank: f64,
    pub emission: Tao,
    pub incentive: f64,
    pub consensus: f64,
    pub trust: f64,
    pub validator_trust: f64,
    pub dividends: f64,
    pub last_update: u64,
    pub validator_permit: bool,
    pub pruning_score: PruningScore,
    pub stakes: Stakes,
}

/// Error returned by `Metagraph::new` when the underlying neuron list
/// violates the uid/hotkey invariants that callers rely on.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MetagraphInvariantError {
    #[error("duplicate hotkey {0} in neuron table")]
    DuplicateHotkey(Hotkey),
    #[error("duplicate uid {0} in neuron table")]
    DuplicateUid(u16),
    #[error("uids are not a contiguous [0, {0}) range")]
    NonContiguousUids(usize),
}

/// Snapshot of a subnet's neuron table at a fixed block.
///
/// Invariants (enforced by [`Metagraph::new`]): hotkeys are unique, uids are
/// unique, and the uid set is exactly `[0, neurons.len())`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metagraph {
    pub block: Block,
    pub neurons: HashMap<Hotkey, Neuron>,
}

impl Metagraph {
    pub fn new(block: Block, neurons: Vec<Neuron>) -> Result<Self, MetagraphInvariantError> {
        let mut by_uid = vec![false; neurons.len()];
        let mut map = HashMap::with_capacity(neurons.len());

        for neuron in neurons {
            if (neuron.uid as usize) >= by_uid.len() {
                return Err(MetagraphInvariantError::NonContiguousUids(by_uid.len()));
            }
            if std::mem::replace(&mut by_uid[neuron.uid as usize], true) {
                return Err(MetagraphInvariantError::DuplicateUid(neuron.uid));
            }
            if map.insert(neuron.hotkey.clone(), neuron).is_some() {
                return Err(MetagraphInvariantError::DuplicateHotkey(
                    map.keys().last().cloned().unwrap(),
                ));
            }
        }

        if !by_uid.iter().all(|seen| *seen) {
            return Err(MetagraphInvariantError::NonContiguousUids(by_uid.len()));
        }

        Ok(Self { block, neurons: map })
    }

    pub fn by_uid(&self, uid: u16) -> Option<&Neuron> {
        self.neurons.values().find(|n| n.uid == uid)
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }
}

/// The two shapes the commit-reveal hyperparameter takes on the source
/// chain: a plain boolean on older runtimes, and a versioned enum on newer
/// ones. Pylon always surfaces the enum; `DISABLED` is "falsy".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitRevealVersion {
    Disabled,
    V2,
    V3,
    V4,
}

impl CommitRevealVersion {
    pub fn is_enabled(self) -> bool {
        !matches!(self, CommitRevealVersion::Disabled)
    }

    pub fn from_bool(b: bool) -> Self {
        if b {
            CommitRevealVersion::V2
        } else {
            CommitRevealVersion::Disabled
        }
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => CommitRevealVersion::Disabled,
            2 => CommitRevealVersion::V2,
            3 => CommitRevealVersion::V3,
            4 => CommitRevealVersion::V4,
            _ => CommitRevealVersion::Disabled,
        }
    }
}

/// Subnet-wide hyperparameters. Every field is optional: `None` means "not
/// yet observed" rather than a chain-side zero value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubnetHyperparams {
    pub max_weights_limit: Option<u16>,
    pub commit_reveal_weights_enabled: Option<CommitRevealVersion>,
    pub tempo: Option<u16>,
    pub weights_rate_limit: Option<u64>,
    pub min_stake: Option<u64>,
    pub rho: Option<u16>,
    pub kappa: Option<u16>,
    pub weights_version: Option<u64>,
    pub activity_cutoff: Option<u16>,
    pub max_validators: Option<u16>,
    pub adjustment_alpha: Option<u64>,
}

impl SubnetHyperparams {
    /// Fields whose values changed between `self` (old) and `other` (new),
    /// as `(field_name, old_repr, new_repr)` triples, for the periodic
    /// refresh task's change-logging requirement.
    pub fn diff(&self, other: &SubnetHyperparams) -> Vec<(&'static str, String, String)> {
        macro_rules! field_diff {
            ($out:ident, $field:ident) => {
                if self.$field != other.$field {
                    $out.push((
                        stringify!($field),
                        format!("{:?}", self.$field),
                        format!("{:?}", other.$field),
                    ));
                }
            };
        }
        let mut out = Vec::new();
        field_diff!(out, max_weights_limit);
        field_diff!(out, commit_reveal_weights_enabled);
        field_diff!(out, tempo);
        field_diff!(out, weights_rate_limit);
        field_diff!(out, min_stake);
        field_diff!(out, rho);
        field_diff!(out, kappa);
        field_diff!(out, weights_version);
        field_diff!(out, activity_cutoff);
        field_diff!(out, max_validators);
        field_diff!(out, adjustment_alpha);
        out
    }
}

/// Signature algorithm used by a [`NeuronCertificate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificateAlgorithm {
    Ed25519,
    Unknown(u8),
}

impl CertificateAlgorithm {
    pub const ED25519_CODE: u8 = 1;
}

impl From<u8> for CertificateAlgorithm {
    fn from(v: u8) -> Self {
        match v {
            Self::ED25519_CODE => CertificateAlgorithm::Ed25519,
            n => CertificateAlgorithm::Unknown(n),
        }
    }
}

impl From<CertificateAlgorithm> for u8 {
    fn from(a: CertificateAlgorithm) -> u8 {
        match a {
            CertificateAlgorithm::Ed25519 => CertificateAlgorithm::ED25519_CODE,
            CertificateAlgorithm::Unknown(n) => n,
        }
    }
}

/// Public serving certificate published by a neuron for a subnet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronCertificate {
    pub algorithm: CertificateAlgorithm,
    pub public_key: Vec<u8>,
}

/// A freshly-generated certificate, including the private half. Never
/// stored server-side beyond the response that returns it once.
#[derive(Clone, Serialize, Deserialize, zeroize::ZeroizeOnDrop)]
pub struct NeuronCertificateKeypair {
    #[zeroize(skip)]
    pub algorithm: CertificateAlgorithm,
    #[zeroize(skip)]
    pub public_key: Vec<u8>,
    pub private_key: Vec<u8>,
}

impl fmt::Debug for NeuronCertificateKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeuronCertificateKeypair")
            .field("algorithm", &self.algorithm)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Half-open block window `[start, end)` over which weights accumulate
/// before a validator submits once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epoch {
    pub start: BlockNumber,
    pub end: BlockNumber,
}

impl Epoch {
    pub fn contains(&self, block: BlockNumber) -> bool {
        block >= self.start && block < self.end
    }
}

/// A single weight score as persisted in the external weight store, keyed
/// by `(hotkey, epoch)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub hotkey: Hotkey,
    pub epoch: BlockNumber,
    pub weight: f64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Block-stamped neuron listing returned by `GET /subnet/{netuid}/neurons/{block}`
/// and `GET /neurons/latest`; distinct from the hotkey-keyed [`Metagraph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubnetNeurons {
    pub netuid: NetUid,
    pub block: Block,
    pub neurons: Vec<Neuron>,
}

impl From<&Metagraph> for SubnetNeurons {
    fn from(mg: &Metagraph) -> Self {
        let mut neurons: Vec<Neuron> = mg.neurons.values().cloned().collect();
        neurons.sort_by_key(|n| n.uid);
        Self {
            netuid: 0,
            block: mg.block.clone(),
            neurons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neuron(uid: u16, hotkey: &str) -> Neuron {
        Neuron {
            uid,
            coldkey: Coldkey::from("5Coldkey"),
            hotkey: Hotkey::from(hotkey),
            active: true,
            axon_info: None,
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

    fn block() -> Block {
        Block {
            number: 1,
            hash: BlockHash::new("deadbeef"),
        }
    }

    #[test]
    fn metagraph_accepts_contiguous_uids() {
        let mg = Metagraph::new(block(), vec![neuron(0, "a"), neuron(1, "b")]).unwrap();
        assert_eq!(mg.len(), 2);
        assert_eq!(mg.by_uid(1).unwrap().hotkey.as_str(), "b");
    }

    #[test]
    fn metagraph_rejects_duplicate_uid() {
        let err = Metagraph::new(block(), vec![neuron(0, "a"), neuron(0, "b")]).unwrap_err();
        assert!(matches!(err, MetagraphInvariantError::DuplicateUid(0)));
    }

    #[test]
    fn metagraph_rejects_non_contiguous_uids() {
        let err = Metagraph::new(block(), vec![neuron(0, "a"), neuron(2, "b")]).unwrap_err();
        assert!(matches!(err, MetagraphInvariantError::NonContiguousUids(_)));
    }

    #[test]
    fn commit_reveal_disabled_is_not_enabled() {
        assert!(!CommitRevealVersion::Disabled.is_enabled());
        assert!(CommitRevealVersion::V4.is_enabled());
        assert!(CommitRevealVersion::from_bool(true).is_enabled());
    }

    #[test]
    fn epoch_contains_is_half_open() {
        let e = Epoch { start: 10, end: 20 };
        assert!(e.contains(10));
        assert!(e.contains(19));
        assert!(!e.contains(20));
    }
}
