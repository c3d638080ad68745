//! Keyfile storage for Bittensor wallets.
//!
//! This module loads keypairs stored on disk in the Python Bittensor SDK's
//! keyfile format.
//!
//! ## Keyfile Format
//!
//! The keyfile format uses JSON with the following structure:
//! ```json
//! {
//!     "crypto": {
//!         "cipher": "secretbox",
//!         "ciphertext": "<base64-encoded encrypted data>",
//!         "cipherparams": {"nonce": "<base64-encoded 24-byte nonce>"},
//!         "kdf": "argon2id",
//!         "kdfparams": {
//!             "salt": "<base64-encoded 16-byte salt>",
//!             "n": 65536,
//!             "r": 1,
//!             "p": 4
//!         }
//!     },
//!     "version": 4
//! }
//! ```
//! A keyfile may also be unencrypted, stored as hex or raw key bytes.

use crate::wallet::keypair::{Keypair, KeypairError};
use argon2::{Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use crypto_secretbox::{
    aead::{Aead, KeyInit},
    XSalsa20Poly1305,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zeroize::Zeroize;

/// Current keyfile format version
pub const KEYFILE_VERSION: u32 = 4;

/// Default Argon2 parameters matching Python SDK
const ARGON2_TIME_COST: u32 = 1;
const ARGON2_MEMORY_COST: u32 = 65536; // 64 MiB
const ARGON2_PARALLELISM: u32 = 4;

/// Errors that can occur during keyfile operations.
#[derive(Debug, Error)]
pub enum KeyfileError {
    #[error("Keyfile not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid keyfile format: {0}")]
    InvalidFormat(String),

    #[error("Decryption failed: wrong password or corrupted keyfile")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Keypair error: {0}")]
    Keypair(#[from] KeypairError),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Unsupported keyfile version: {0}")]
    UnsupportedVersion(u32),

    #[error("Password required for encrypted keyfile")]
    PasswordRequired,
}

/// Encryption parameters for a keyfile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfParams {
    pub salt: String,
    #[serde(rename = "n")]
    pub memory_cost: u32,
    #[serde(rename = "r")]
    pub time_cost: u32,
    #[serde(rename = "p")]
    pub parallelism: u32,
}

/// Cipher parameters for a keyfile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherParams {
    pub nonce: String,
}

/// Crypto section of the keyfile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoData {
    pub cipher: String,
    pub ciphertext: String,
    pub cipherparams: CipherParams,
    pub kdf: String,
    pub kdfparams: KdfParams,
}

/// The complete keyfile structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyfileJson {
    pub crypto: CryptoData,
    pub version: u32,
}

/// Decoded encrypted key material.
#[derive(Debug, Clone)]
pub struct KeyfileData {
    /// Encrypted key bytes
    pub encrypted_key: Vec<u8>,
    /// 24-byte nonce for XSalsa20Poly1305
    pub nonce: [u8; 24],
    /// 16-byte salt for Argon2
    pub salt: [u8; 16],
}

/// A keyfile represents a keypair stored on disk.
///
/// The keyfile can be encrypted (password-protected) or unencrypted.
pub struct Keyfile {
    path: PathBuf,
    keypair: Option<Keypair>,
}

impl std::fmt::Debug for Keyfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keyfile")
            .field("path", &self.path)
            .field("loaded", &self.keypair.is_some())
            .finish()
    }
}

impl Keyfile {
    /// Create a new keyfile handle for the given path.
    ///
    /// This does not read the keyfile from disk.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            keypair: None,
        }
    }

    /// Get the path to this keyfile.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the keyfile exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Check if the keyfile is encrypted.
    ///
    /// Returns `false` if the file doesn't exist or can't be read.
    pub fn is_encrypted(&self) -> bool {
        if !self.exists() {
            return false;
        }

        match self.read_raw() {
            Ok(data) => serde_json::from_slice::<KeyfileJson>(&data).is_ok(),
            Err(_) => false,
        }
    }

    /// Get the keypair, decrypting if necessary.
    ///
    /// # Arguments
    /// * `password` - Password for decryption (required if encrypted)
    pub fn get_keypair(&self, password: Option<&str>) -> Result<Keypair, KeyfileError> {
        if let Some(ref kp) = self.keypair {
            return Ok(kp.clone());
        }

        if !self.exists() {
            return Err(KeyfileError::NotFound(self.path.clone()));
        }

        let data = self.read_raw()?;
        self.decrypt_keypair(&data, password)
    }

    /// Decrypt data using Argon2id + XSalsa20Poly1305.
    fn decrypt(&self, data: &KeyfileData, password: &str) -> Result<Vec<u8>, KeyfileError> {
        let mut key = derive_key(password, &data.salt)?;

        let cipher = XSalsa20Poly1305::new_from_slice(&key).map_err(|e| {
            KeyfileError::KeyDerivationFailed(format!("Failed to create cipher: {}", e))
        })?;

        let decrypted = cipher
            .decrypt(data.nonce.as_ref().into(), data.encrypted_key.as_ref())
            .map_err(|_| KeyfileError::DecryptionFailed)?;

        key.zeroize();

        Ok(decrypted)
    }

    /// Read raw bytes from the keyfile.
    fn read_raw(&self) -> Result<Vec<u8>, KeyfileError> {
        let mut file = fs::File::open(&self.path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Parse JSON and decrypt to keypair.
    fn decrypt_keypair(
        &self,
        data: &[u8],
        password: Option<&str>,
    ) -> Result<Keypair, KeyfileError> {
        // Try to parse as JSON (encrypted format)
        if let Ok(json) = serde_json::from_slice::<KeyfileJson>(data) {
            return self.decrypt_from_json(&json, password);
        }

        // Try as unencrypted hex
        if let Ok(hex_str) = std::str::from_utf8(data) {
            let hex_str = hex_str.trim();
            if let Ok(key_bytes) = hex::decode(hex_str) {
                return Keypair::from_bytes(&key_bytes).map_err(KeyfileError::Keypair);
            }
        }

        // Try as raw bytes (legacy unencrypted)
        if data.len() >= 32 {
            if let Ok(keypair) = Keypair::from_bytes(data) {
                return Ok(keypair);
            }
        }

        Err(KeyfileError::InvalidFormat(
            "Could not parse keyfile data".to_string(),
        ))
    }

    /// Decrypt keypair from parsed JSON.
    fn decrypt_from_json(
        &self,
        json: &KeyfileJson,
        password: Option<&str>,
    ) -> Result<Keypair, KeyfileError> {
        if json.version > KEYFILE_VERSION {
            return Err(KeyfileError::UnsupportedVersion(json.version));
        }

        let password = password.ok_or(KeyfileError::PasswordRequired)?;

        let ciphertext = BASE64.decode(&json.crypto.ciphertext)?;
        let nonce_bytes = BASE64.decode(&json.crypto.cipherparams.nonce)?;
        let salt_bytes = BASE64.decode(&json.crypto.kdfparams.salt)?;

        if nonce_bytes.len() != 24 {
            return Err(KeyfileError::InvalidFormat(format!(
                "Invalid nonce length: expected 24, got {}",
                nonce_bytes.len()
            )));
        }

        if salt_bytes.len() != 16 {
            return Err(KeyfileError::InvalidFormat(format!(
                "Invalid salt length: expected 16, got {}",
                salt_bytes.len()
            )));
        }

        let mut nonce = [0u8; 24];
        let mut salt = [0u8; 16];
        nonce.copy_from_slice(&nonce_bytes);
        salt.copy_from_slice(&salt_bytes);

        let keyfile_data = KeyfileData {
            encrypted_key: ciphertext,
            nonce,
            salt,
        };

        let key_bytes = self.decrypt(&keyfile_data, password)?;
        Keypair::from_bytes(&key_bytes).map_err(KeyfileError::Keypair)
    }
}

/// Derive an encryption key using Argon2id.
fn derive_key(password: &str, salt: &[u8; 16]) -> Result<[u8; 32], KeyfileError> {
    let params = Params::new(
        ARGON2_MEMORY_COST,
        ARGON2_TIME_COST,
        ARGON2_PARALLELISM,
        Some(32),
    )
    .map_err(|e| KeyfileError::KeyDerivationFailed(e.to_string()))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; 32];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| KeyfileError::KeyDerivationFailed(e.to_string()))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use sp_core::Pair;
    use tempfile::tempdir;

    /// Build an encrypted keyfile on disk the same way the Python SDK would,
    /// without carrying the (now removed) `Keyfile::set_keypair` write path.
    fn write_encrypted_keyfile(path: &Path, keypair: &Keypair, password: &str) {
        let mut salt = [0u8; 16];
        let mut nonce = [0u8; 24];
        let mut rng = rand::rng();
        rng.fill_bytes(&mut salt);
        rng.fill_bytes(&mut nonce);

        let mut key = derive_key(password, &salt).unwrap();
        let cipher = XSalsa20Poly1305::new_from_slice(&key).unwrap();
        let raw_seed = keypair.pair().to_raw_vec();
        let ciphertext = cipher.encrypt(nonce.as_ref().into(), raw_seed.as_ref()).unwrap();
        key.zeroize();

        let json = KeyfileJson {
            crypto: CryptoData {
                cipher: "secretbox".to_string(),
                ciphertext: BASE64.encode(&ciphertext),
                cipherparams: CipherParams {
                    nonce: BASE64.encode(nonce),
                },
                kdf: "argon2id".to_string(),
                kdfparams: KdfParams {
                    salt: BASE64.encode(salt),
                    memory_cost: ARGON2_MEMORY_COST,
                    time_cost: ARGON2_TIME_COST,
                    parallelism: ARGON2_PARALLELISM,
                },
            },
            version: KEYFILE_VERSION,
        };
        fs::write(path, serde_json::to_vec_pretty(&json).unwrap()).unwrap();
    }

    #[test]
    fn test_keyfile_roundtrip_encrypted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_key");
        let original = Keypair::from_bytes(&[9u8; 32]).unwrap();
        let password = "test_password";

        write_encrypted_keyfile(&path, &original, password);

        let keyfile = Keyfile::new(&path);
        assert!(keyfile.exists());
        assert!(keyfile.is_encrypted());

        let loaded = keyfile.get_keypair(Some(password)).unwrap();
        assert_eq!(original.public_key(), loaded.public_key());

        // Wrong password fails.
        assert!(keyfile.get_keypair(Some("wrong")).is_err());
        // No password required.
        assert!(matches!(
            keyfile.get_keypair(None),
            Err(KeyfileError::PasswordRequired)
        ));
    }

    #[test]
    fn test_keyfile_roundtrip_unencrypted_hex() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_key_unenc");
        let original = Keypair::from_bytes(&[3u8; 32]).unwrap();

        fs::write(&path, hex::encode(original.pair().to_raw_vec())).unwrap();

        let keyfile = Keyfile::new(&path);
        assert!(keyfile.exists());
        assert!(!keyfile.is_encrypted());

        let loaded = keyfile.get_keypair(None).unwrap();
        assert_eq!(original.public_key(), loaded.public_key());
    }

    #[test]
    fn test_keyfile_not_found() {
        let keyfile = Keyfile::new("/nonexistent/path/key");
        let result = keyfile.get_keypair(None);
        assert!(matches!(result, Err(KeyfileError::NotFound(_))));
    }
}
