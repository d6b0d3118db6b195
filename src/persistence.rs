/// Save-file pipeline: serialize, then optionally encrypt
///
/// The game data body is serde_json; encryption is AES-256-GCM with a
/// key derived from a fixed passphrase. The nonce is freshly randomized
/// for every encryption and written as a prefix of the blob, and decrypt
/// reads it back from that prefix.

use std::fs;
use std::path::{Path, PathBuf};

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use log::{info, warn};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::save::GameData;

/// Fixed application passphrase the AES key is derived from; the key
/// itself is never stored.
const PASSPHRASE: &str = "shopfloor";

/// AES-GCM standard nonce length, prefixed to every encrypted blob.
const NONCE_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("encryption failed")]
    Encryption,
    #[error("decryption failed (wrong key or corrupt blob)")]
    Decryption,
    #[error("save blob shorter than its nonce prefix")]
    Truncated,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One save file on disk. Holds the load-succeeded flag: a missing file
/// is a fresh start, not an error, and leaves the flag false.
pub struct SaveFile {
    path: PathBuf,
    encrypt: bool,
    pretty: bool,
    loaded: bool,
}

impl SaveFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            encrypt: true,
            pretty: false,
            loaded: false,
        }
    }

    pub fn with_encryption(mut self, encrypt: bool) -> Self {
        self.encrypt = encrypt;
        self
    }

    /// Pretty-print the JSON body; only useful with encryption off.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a save or load has completed against this file.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Serialize, optionally encrypt, and write the whole game state.
    /// Completes fully before returning; there is no partial save.
    pub fn save(&mut self, data: &GameData) -> Result<(), PersistError> {
        let body = if self.pretty {
            serde_json::to_vec_pretty(data)?
        } else {
            serde_json::to_vec(data)?
        };

        let blob = if self.encrypt { encrypt(&body)? } else { body };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, blob)?;

        info!("game data saved to {}", self.path.display());
        self.loaded = true;
        Ok(())
    }

    /// Read the whole game state back. `Ok(None)` means no save file
    /// exists yet; corrupt or undecryptable blobs are errors.
    pub fn load(&mut self) -> Result<Option<GameData>, PersistError> {
        if !self.path.exists() {
            warn!("save file not found at {}", self.path.display());
            self.loaded = false;
            return Ok(None);
        }

        let blob = fs::read(&self.path)?;
        let body = if self.encrypt { decrypt(&blob)? } else { blob };
        let data: GameData = serde_json::from_slice(&body)?;

        info!("game data loaded from {}", self.path.display());
        self.loaded = true;
        Ok(Some(data))
    }
}

fn cipher() -> Aes256Gcm {
    let key = Sha256::digest(PASSPHRASE.as_bytes());
    Aes256Gcm::new_from_slice(key.as_slice()).expect("SHA-256 digest is a valid AES-256 key")
}

fn encrypt(plain: &[u8]) -> Result<Vec<u8>, PersistError> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher()
        .encrypt(&nonce, plain)
        .map_err(|_| PersistError::Encryption)?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(nonce.as_slice());
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

fn decrypt(blob: &[u8]) -> Result<Vec<u8>, PersistError> {
    if blob.len() < NONCE_LEN {
        return Err(PersistError::Truncated);
    }
    let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
    cipher()
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| PersistError::Decryption)
}
