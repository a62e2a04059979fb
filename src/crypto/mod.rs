//! Credential encryption for VenueSender
//!
//! Two distinct keys exist in a session: the per-secret key behind the
//! in-memory [`CredentialStore`] (SMTP and mail-account passwords) and the
//! at-rest key that protects the bulk venue database. Both are held by an
//! [`EncryptionContext`] passed by reference; there is no process-global key
//! or nonce.

pub mod encryption;
pub mod key_derivation;
pub mod store;

pub use encryption::{EncryptionContext, NONCE_SIZE, TAG_SIZE};
pub use key_derivation::{derive_context, KeyDerivationParams};
pub use store::CredentialStore;
