//! AES-256-GCM sealing and opening of short secrets
//!
//! The at-rest format of a sealed secret is a single opaque byte string:
//! `nonce (12 bytes) ‖ ciphertext ‖ authentication tag (16 bytes)`. A fresh
//! random nonce is generated for every seal operation; the same (key, nonce)
//! pair is never reused across two plaintexts.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{VenueError, VenueResult};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Holds one AES-256 key for the lifetime of a session
///
/// The key is zeroized when the context is dropped. Contexts are created
/// once and passed by reference to whatever needs them.
pub struct EncryptionContext {
    key: [u8; 32],
}

impl EncryptionContext {
    /// Create a context with a fresh random key
    pub fn generate() -> Self {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    /// Create a context from existing key material
    pub fn from_key(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Get the raw key bytes
    pub(crate) fn key_bytes(&self) -> &[u8; 32] {
        &self.key
    }

    /// Encrypt a plaintext into the `nonce ‖ ciphertext ‖ tag` wire format
    pub fn seal(&self, plaintext: &[u8]) -> VenueResult<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| VenueError::Encryption(format!("Failed to create cipher: {}", e)))?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| VenueError::Encryption(format!("Encryption failed: {}", e)))?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Decrypt a sealed secret, verifying its authentication tag
    ///
    /// The returned buffer zeroizes itself on drop.
    pub fn open(&self, sealed: &[u8]) -> VenueResult<Zeroizing<Vec<u8>>> {
        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(VenueError::SecretFormat(format!(
                "Sealed secret too short: {} bytes, minimum is {}",
                sealed.len(),
                NONCE_SIZE + TAG_SIZE
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| VenueError::Encryption(format!("Failed to create cipher: {}", e)))?;

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = cipher.decrypt(nonce, ciphertext).map_err(|_| {
            VenueError::Decryption("Authentication failed: wrong key or corrupted data".to_string())
        })?;

        Ok(Zeroizing::new(plaintext))
    }

    /// Encrypt a UTF-8 string
    pub fn seal_str(&self, plaintext: &str) -> VenueResult<Vec<u8>> {
        self.seal(plaintext.as_bytes())
    }

    /// Decrypt to a UTF-8 string (zeroized on drop)
    pub fn open_str(&self, sealed: &[u8]) -> VenueResult<Zeroizing<String>> {
        let plaintext = self.open(sealed)?;
        let text = String::from_utf8(plaintext.to_vec())
            .map_err(|e| VenueError::Decryption(format!("Invalid UTF-8 in secret: {}", e)))?;
        Ok(Zeroizing::new(text))
    }

    /// Encrypt and base64-encode, for embedding sealed material in JSON
    pub fn seal_base64(&self, plaintext: &[u8]) -> VenueResult<String> {
        Ok(BASE64.encode(self.seal(plaintext)?))
    }

    /// Decrypt a base64-encoded sealed secret
    pub fn open_base64(&self, sealed: &str) -> VenueResult<Zeroizing<Vec<u8>>> {
        let bytes = BASE64
            .decode(sealed.trim())
            .map_err(|e| VenueError::SecretFormat(format!("Invalid base64: {}", e)))?;
        self.open(&bytes)
    }
}

impl Drop for EncryptionContext {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for EncryptionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.debug_struct("EncryptionContext").finish_non_exhaustive()
    }
}
