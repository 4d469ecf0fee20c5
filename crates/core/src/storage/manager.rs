use crate::errors::CoreError;
use crate::store::memory::StoreSnapshot;

use super::encryption::{self, KdfParams};
use super::format;

/// High-level snapshot operations: save/load the whole store to/from
/// encrypted bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// Encrypt and serialize a store snapshot to raw bytes (portable,
    /// platform-independent).
    ///
    /// Flow: StoreSnapshot → bincode → AES-256-GCM(Argon2id(password)) → PTRD bytes
    pub fn save_to_bytes(snapshot: &StoreSnapshot, password: &str) -> Result<Vec<u8>, CoreError> {
        let plaintext = bincode::serialize(snapshot)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize snapshot: {e}")))?;

        let salt = encryption::generate_salt()?;
        let nonce = encryption::generate_nonce()?;

        let kdf_params = KdfParams::default();
        let key = encryption::derive_key(password, &salt, &kdf_params)?;

        let ciphertext = encryption::encrypt(&plaintext, &key, &nonce)?;

        Ok(format::write_snapshot(
            format::CURRENT_VERSION,
            &kdf_params,
            &salt,
            &nonce,
            &ciphertext,
        ))
    }

    /// Decrypt and deserialize a store snapshot from raw bytes.
    ///
    /// Flow: PTRD bytes → parse header → Argon2id(password, salt) → AES-256-GCM decrypt → bincode → StoreSnapshot
    pub fn load_from_bytes(data: &[u8], password: &str) -> Result<StoreSnapshot, CoreError> {
        let (header, ciphertext) = format::read_snapshot(data)?;

        let key = encryption::derive_key(password, &header.salt, &header.kdf_params)?;

        let plaintext = encryption::decrypt(ciphertext, &key, &header.nonce)?;

        let snapshot: StoreSnapshot = bincode::deserialize(&plaintext).map_err(|e| {
            CoreError::Deserialization(format!("Failed to deserialize snapshot: {e}"))
        })?;

        Ok(snapshot)
    }

    /// Save a snapshot to an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(
        snapshot: &StoreSnapshot,
        path: &str,
        password: &str,
    ) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(snapshot, password)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a snapshot from an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<StoreSnapshot, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes, password)
    }
}
