//! Wallet key management for Bittensor.
//!
//! This module loads an existing coldkey/hotkey pair from disk in the
//! Python Bittensor SDK's keyfile format:
//!
//! - **Keyfile loading** (Argon2id + NaCl secretbox decryption)
//! - **Keypair derivation** (SR25519, SS58 address encoding)
//! - **Wallet** (coldkey/hotkey pair lookup by name)
//!
//! Wallet and keyfile *creation* is intentionally out of scope: a Pylon
//! identity always names an existing wallet on disk.
//!
//! # Example
//!
//! ```no_run
//! use pylon::wallet::Wallet;
//!
//! let wallet = Wallet::new("my_wallet", "default", None).unwrap();
//! let hotkey = wallet.hotkey_keypair(None).unwrap();
//! println!("Hotkey address: {}", hotkey.ss58_address());
//! ```

pub mod keyfile;
pub mod keypair;
#[allow(clippy::module_inception)]
pub mod wallet;

pub use keyfile::{Keyfile, KeyfileData, KeyfileError, KeyfileJson, KEYFILE_VERSION};
pub use keypair::{Keypair, KeypairError, BITTENSOR_SS58_FORMAT};
pub use wallet::{default_wallet_path, Wallet, WalletError};
