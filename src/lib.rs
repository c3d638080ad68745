
pub mod cache;
pub mod chain;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod errors;
pub mod http;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod queries;
pub mod request;
pub mod store;
pub mod types;
pub mod utils;
pub mod validator;
pub mod wallet;

pub use chain::{BittensorClient, Error as ChainError};
pub use config::{Identity, Settings};

// Re-export logging module
pub use logging::{
    init_default_logging, init_logging, is_initialized, BittensorFormatter, CompactFormatter,
    JsonFormatter, LogFormat, LoggingConfig,
};

// Re-export types first (includes liquidity types)
pub use types::*;

// Re-export queries with specific naming to avoid conflicts
pub use queries::{chain_info::*, subnets::*};

// Re-export neurons module
pub use queries::neurons::{get_all_neuron_certificates, get_neuron_certificate};
pub use queries::neurons as neuron_queries;

// Re-export validator weights/commitments with a prefix to avoid conflict
pub use validator::weights as validator_weights;

// Re-export utils with specific modules to avoid conflicts
pub use utils::{balance, crypto, encode, scale, ss58};

// Re-export decoders module
pub use utils::decoders;

// Re-export weights utils with prefix to avoid conflict
pub use utils::weights as utils_weights;

// Re-export key crypto functions for commit-reveal
pub use utils::crypto::{
    commit_hash_to_hex, generate_mechanism_commit_hash, generate_salt,
    generate_subtensor_commit_hash, hex_to_commit_hash_32, salt_u8_to_u16, verify_commit_hash,
};

// Re-export the DRAND reveal-round calculation (component E, commit-reveal scheduling)
pub use chain::epoch::{calculate_reveal_round, calculate_reveal_round_for_epoch, DrandInfo};

// Re-export wallet module for key management
pub use wallet::{
    default_wallet_path, Keyfile, KeyfileData, KeyfileError, Keypair, KeypairError, Wallet,
    WalletError as WalletModuleError, BITTENSOR_SS58_FORMAT, KEYFILE_VERSION,
};

// Re-export comprehensive error types
pub use errors::{
    // Unified error type and result alias
    BittensorError, BittensorResult,
    // Chain/Network Errors
    BlockNotFound, ChainConnectionError, ChainQueryError, ExtrinsicError, MetadataError,
    TransactionFailed,
    // Wallet Errors
    InvalidKeyfile, InvalidMnemonic, KeyExists, KeyfileDecryptionError, KeyfileNotFound,
    KeyfilePermissionError, WalletError,
    // Registration Errors
    AlreadyRegistered, NotRegistered, PowFailed, RegistrationFailed,
    // Stake Errors
    InsufficientBalance, InsufficientStake, StakeFailed,
    // Weights Errors
    InvalidWeights, TooManyWeights, WeightVersionMismatch, WeightsError,
    // Synapse/Communication Errors
    SerializationError, SynapseBlacklisted, SynapseError, SynapseTimeout, SynapseUnauthorized,
    // Dendrite Errors
    AxonUnreachable, DendriteError, InvalidResponse,
    // Axon Errors
    AxonConfigError, AxonError, AxonNotServing,
    // Senate/Governance Errors
    AlreadySenateMember, NotSenateMember, ProposalNotFound, VoteFailed,
};
