// Runtime types and utilities for Bittensor chain interactions
// We use PolkadotConfig from subxt as Bittensor is based on Substrate

// Re-export for convenience
pub use subxt::PolkadotConfig as BittensorConfig;
