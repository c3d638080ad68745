//! Wallet management for Bittensor.
//!
//! This module provides the `Wallet` struct for loading an existing coldkey/
//! hotkey pair from disk, compatible with the Python Bittensor SDK wallet
//! layout.
//!
//! ## Wallet Structure
//!
//! A Bittensor wallet consists of:
//! - **Coldkey**: The main key that holds funds and controls the hotkey
//! - **Hotkey**: The key used for network operations (mining, validation)
//!
//! Wallets are stored in the filesystem with the following structure:
//! ```text
//! ~/.bittensor/wallets/
//!   └── <wallet_name>/
//!       ├── coldkey          # Encrypted coldkey
//!       ├── coldkeypub.txt   # Public coldkey SS58 address
//!       └── hotkeys/
//!           └── <hotkey_name> # Encrypted hotkey
//! ```

use crate::wallet::keyfile::{Keyfile, KeyfileError};
use crate::wallet::keypair::{Keypair, KeypairError};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Default wallet directory name under home
const WALLET_DIR_NAME: &str = ".bittensor/wallets";

/// Default coldkey filename
const COLDKEY_FILENAME: &str = "coldkey";

/// Coldkey public key filename
const COLDKEYPUB_FILENAME: &str = "coldkeypub.txt";

/// Hotkeys directory name
const HOTKEYS_DIR: &str = "hotkeys";

/// Errors that can occur during wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Keyfile error: {0}")]
    Keyfile(#[from] KeyfileError),

    #[error("Keypair error: {0}")]
    Keypair(#[from] KeypairError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid name: {0}")]
    InvalidName(String),
}

/// Sanitize a name to prevent path traversal attacks.
///
/// # Security
/// This function prevents directory traversal attacks (CWE-22) by rejecting:
/// - Path separators (`/` or `\`)
/// - Parent directory references (`..`)
/// - Empty or whitespace-only names
/// - Names starting with a dot (hidden files)
fn sanitize_name(name: &str) -> Result<&str, WalletError> {
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(WalletError::InvalidName(format!(
            "Name '{}' contains invalid path characters",
            name
        )));
    }
    if name.trim().is_empty() {
        return Err(WalletError::InvalidName("Name cannot be empty".to_string()));
    }
    if name.starts_with('.') {
        return Err(WalletError::InvalidName(format!(
            "Name '{}' cannot start with a dot",
            name
        )));
    }
    Ok(name)
}

/// A Bittensor wallet handle over an existing coldkey/hotkey pair on disk.
pub struct Wallet {
    /// Wallet name
    pub name: String,
    /// Base path for wallet storage
    pub path: PathBuf,
    /// Name of the hotkey to use
    pub hotkey_name: String,
    coldkey: Keyfile,
    hotkey: Keyfile,
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("hotkey_name", &self.hotkey_name)
            .finish()
    }
}

impl Wallet {
    /// Create a wallet handle over an existing coldkey/hotkey pair, without
    /// touching disk.
    ///
    /// # Arguments
    /// * `name` - Wallet name (directory name under wallets/)
    /// * `hotkey` - Hotkey name
    /// * `path` - Optional custom base path (defaults to ~/.bittensor/wallets)
    ///
    /// # Security
    /// Both `name` and `hotkey` are sanitized to prevent path traversal attacks.
    ///
    /// # Example
    /// ```
    /// use pylon::wallet::Wallet;
    /// let wallet = Wallet::new("my_wallet", "default", None).unwrap();
    /// ```
    pub fn new(name: &str, hotkey: &str, path: Option<&str>) -> Result<Self, WalletError> {
        let name = sanitize_name(name)?;
        let hotkey = sanitize_name(hotkey)?;

        let base_path = match path {
            Some(p) => PathBuf::from(p),
            None => default_wallet_path(),
        };

        let wallet_path = base_path.join(name);
        let coldkey_path = wallet_path.join(COLDKEY_FILENAME);
        let hotkey_path = wallet_path.join(HOTKEYS_DIR).join(hotkey);

        Ok(Self {
            name: name.to_string(),
            path: wallet_path,
            hotkey_name: hotkey.to_string(),
            coldkey: Keyfile::new(coldkey_path),
            hotkey: Keyfile::new(hotkey_path),
        })
    }

    /// Get a reference to the coldkey keyfile.
    pub fn coldkey(&self) -> &Keyfile {
        &self.coldkey
    }

    /// Get a reference to the hotkey keyfile.
    pub fn hotkey(&self) -> &Keyfile {
        &self.hotkey
    }

    /// Get the coldkey keypair.
    ///
    /// # Arguments
    /// * `password` - Password for decryption (if encrypted)
    pub fn coldkey_keypair(&self, password: Option<&str>) -> Result<Keypair, WalletError> {
        self.coldkey
            .get_keypair(password)
            .map_err(WalletError::Keyfile)
    }

    /// Get the hotkey keypair.
    ///
    /// # Arguments
    /// * `password` - Password for decryption (if encrypted)
    pub fn hotkey_keypair(&self, password: Option<&str>) -> Result<Keypair, WalletError> {
        self.hotkey
            .get_keypair(password)
            .map_err(WalletError::Keyfile)
    }

    /// Get the coldkey SS58 address.
    ///
    /// This reads from the coldkeypub.txt file if available, otherwise
    /// decrypts the coldkey to get the address.
    pub fn coldkey_ss58(&self, password: Option<&str>) -> Result<String, WalletError> {
        let pub_path = self.path.join(COLDKEYPUB_FILENAME);
        if pub_path.exists() {
            if let Ok(content) = fs::read_to_string(&pub_path) {
                let address = content.trim().to_string();
                if !address.is_empty() {
                    return Ok(address);
                }
            }
        }

        let keypair = self.coldkey_keypair(password)?;
        Ok(keypair.ss58_address().to_string())
    }

    /// Get the hotkey SS58 address.
    pub fn hotkey_ss58(&self, password: Option<&str>) -> Result<String, WalletError> {
        let keypair = self.hotkey_keypair(password)?;
        Ok(keypair.ss58_address().to_string())
    }

    /// Check if the coldkey exists on disk.
    pub fn coldkey_exists(&self) -> bool {
        self.coldkey.exists()
    }

    /// Check if the hotkey exists on disk.
    pub fn hotkey_exists(&self) -> bool {
        self.hotkey.exists()
    }

    /// Check if both coldkey and hotkey exist.
    pub fn exists(&self) -> bool {
        self.coldkey_exists() && self.hotkey_exists()
    }

    /// Switch to a different hotkey.
    ///
    /// # Security
    /// The hotkey name is sanitized to prevent path traversal attacks.
    pub fn use_hotkey(&mut self, hotkey_name: &str) -> Result<(), WalletError> {
        let hotkey_name = sanitize_name(hotkey_name)?;
        self.hotkey_name = hotkey_name.to_string();
        let hotkey_path = self.path.join(HOTKEYS_DIR).join(hotkey_name);
        self.hotkey = Keyfile::new(hotkey_path);
        Ok(())
    }
}

/// Get the default wallet path (~/.bittensor/wallets).
pub fn default_wallet_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(WALLET_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(WALLET_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_new() {
        let wallet = Wallet::new("test_wallet", "test_hotkey", None).unwrap();
        assert_eq!(wallet.name, "test_wallet");
        assert_eq!(wallet.hotkey_name, "test_hotkey");
    }

    #[test]
    fn test_wallet_missing_keyfile() {
        let dir = tempfile::tempdir().unwrap();
        let wallet =
            Wallet::new("test_wallet", "default", Some(dir.path().to_str().unwrap())).unwrap();

        assert!(!wallet.exists());
        assert!(wallet.hotkey_keypair(None).is_err());
    }

    #[test]
    fn test_path_traversal_prevention() {
        assert!(sanitize_name("../evil").is_err());
        assert!(sanitize_name("foo/../bar").is_err());
        assert!(sanitize_name("foo/bar").is_err());
        assert!(sanitize_name("foo\\bar").is_err());
        assert!(sanitize_name(".hidden").is_err());
        assert!(sanitize_name("").is_err());
        assert!(sanitize_name("   ").is_err());

        assert!(sanitize_name("valid_name").is_ok());
        assert!(sanitize_name("wallet-1").is_ok());
        assert!(sanitize_name("MyWallet").is_ok());
    }

    #[test]
    fn test_wallet_new_rejects_path_traversal() {
        assert!(Wallet::new("../evil", "default", None).is_err());
        assert!(Wallet::new("good", "../evil", None).is_err());
        assert!(Wallet::new(".hidden", "default", None).is_err());
        assert!(Wallet::new("good", ".hidden", None).is_err());
        assert!(Wallet::new("foo/bar", "default", None).is_err());
        assert!(Wallet::new("good", "foo/bar", None).is_err());

        assert!(Wallet::new("valid_wallet", "valid_hotkey", None).is_ok());
    }

    #[test]
    fn test_use_hotkey_rejects_path_traversal() {
        let mut wallet = Wallet::new("test_wallet", "default", None).unwrap();

        assert!(wallet.use_hotkey("../evil").is_err());
        assert!(wallet.use_hotkey(".hidden").is_err());
        assert!(wallet.use_hotkey("foo/bar").is_err());

        assert!(wallet.use_hotkey("valid_hotkey").is_ok());
    }

    #[test]
    fn test_wallet_path_functions() {
        let default_path = default_wallet_path();
        assert!(default_path.ends_with(".bittensor/wallets"));
    }
}
