//! Keypair management for Bittensor wallets.
//!
//! This module provides SR25519 keypair functionality for signing transactions,
//! compatible with the Substrate ecosystem and the Python Bittensor SDK.

use sp_core::{
    crypto::{Ss58AddressFormat, Ss58Codec},
    sr25519, Pair,
};
use thiserror::Error;
use zeroize::ZeroizeOnDrop;

/// Bittensor SS58 address format (42 = "bt")
pub const BITTENSOR_SS58_FORMAT: u16 = 42;

/// Errors that can occur during keypair operations.
#[derive(Debug, Error)]
pub enum KeypairError {
    #[error("Key derivation error: {0}")]
    DerivationError(String),
}

/// An SR25519 keypair derived from an on-disk keyfile.
///
/// # Security Note
///
/// The underlying `sr25519::Pair` type from sp_core does not implement `Zeroize`,
/// meaning the private key material may remain in memory after this struct is dropped.
/// The `public_key` field IS properly zeroized on drop.
#[derive(ZeroizeOnDrop)]
pub struct Keypair {
    /// The underlying sr25519 pair. Note: This is NOT zeroized on drop as
    /// sp_core::sr25519::Pair does not implement Zeroize.
    #[zeroize(skip)]
    pair: sr25519::Pair,
    /// The 32-byte public key. This field IS zeroized on drop.
    public_key: [u8; 32],
    /// The SS58-encoded address. Skipped from zeroization as it's derived from public key.
    #[zeroize(skip)]
    ss58_address: String,
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        Self {
            pair: self.pair.clone(),
            public_key: self.public_key,
            ss58_address: self.ss58_address.clone(),
        }
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Don't expose the private key in debug output
        f.debug_struct("Keypair")
            .field("ss58_address", &self.ss58_address)
            .finish()
    }
}

impl Keypair {
    /// Create a keypair from an sr25519 pair.
    fn from_pair(pair: sr25519::Pair) -> Self {
        let public = pair.public();
        let public_key: [u8; 32] = public.0;
        let ss58_address =
            public.to_ss58check_with_version(Ss58AddressFormat::custom(BITTENSOR_SS58_FORMAT));

        Self {
            pair,
            public_key,
            ss58_address,
        }
    }

    /// Get the public key as raw bytes.
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// Get the SS58 address with Bittensor format (prefix 42).
    pub fn ss58_address(&self) -> &str {
        &self.ss58_address
    }

    /// Get the underlying sr25519 pair, for signing extrinsics.
    pub fn pair(&self) -> &sr25519::Pair {
        &self.pair
    }

    /// Restore a keypair from a raw seed, as stored (possibly encrypted) in a keyfile.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeypairError> {
        let pair = sr25519::Pair::from_seed_slice(bytes).map_err(|e| {
            KeypairError::DerivationError(format!("Failed to restore keypair: {:?}", e))
        })?;
        Ok(Self::from_pair(pair))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_roundtrip() {
        let seed = [7u8; 32];
        let pair = sr25519::Pair::from_seed(&seed);
        let bytes = pair.to_raw_vec();

        let keypair = Keypair::from_bytes(&bytes).unwrap();
        assert_eq!(keypair.public_key(), &pair.public().0);
        assert!(keypair.ss58_address().starts_with('5'));
    }

    #[test]
    fn test_from_bytes_invalid() {
        assert!(Keypair::from_bytes(&[0u8; 4]).is_err());
    }
}
