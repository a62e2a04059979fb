//! In-memory credential store
//!
//! Holds sealed account secrets for the lifetime of a session. A secret goes
//! in as plaintext exactly once (at prompt time), lives sealed, and comes
//! back out as a zeroizing buffer immediately before use. Each store owns
//! its own [`EncryptionContext`]; the per-secret key is distinct from the
//! at-rest database key.

use std::collections::HashMap;

use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::EncryptionContext;
use crate::error::{VenueError, VenueResult};

/// Well-known account name for the SMTP password
pub const SMTP_ACCOUNT: &str = "smtp";

/// Well-known account name for the mail account password
pub const MAIL_ACCOUNT: &str = "mail";

/// Session-scoped store of sealed secrets, one per named account
pub struct CredentialStore {
    ctx: EncryptionContext,
    sealed: HashMap<String, Vec<u8>>,
}

impl CredentialStore {
    /// Create a store with a fresh session key
    pub fn new() -> Self {
        Self::with_context(EncryptionContext::generate())
    }

    /// Create a store over an existing context
    pub fn with_context(ctx: EncryptionContext) -> Self {
        Self {
            ctx,
            sealed: HashMap::new(),
        }
    }

    /// Seal a secret under an account name, replacing any previous value
    pub fn store(&mut self, account: &str, secret: &str) -> VenueResult<()> {
        let sealed = self.ctx.seal_str(secret)?;
        self.sealed.insert(account.to_string(), sealed);
        debug!(account, "stored sealed credential");
        Ok(())
    }

    /// Decrypt the secret for an account
    ///
    /// The plaintext is returned in a buffer that zeroizes itself on drop;
    /// callers should hold it only for the duration of the operation that
    /// needs it.
    pub fn reveal(&self, account: &str) -> VenueResult<Zeroizing<String>> {
        let sealed = self.sealed.get(account).ok_or_else(|| {
            VenueError::Decryption(format!("No credential stored for account '{}'", account))
        })?;
        self.ctx.open_str(sealed)
    }

    /// Whether a secret is stored for an account
    pub fn contains(&self, account: &str) -> bool {
        self.sealed.contains_key(account)
    }

    /// Remove a stored secret
    pub fn forget(&mut self, account: &str) {
        self.sealed.remove(account);
        debug!(account, "forgot credential");
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_reveal() {
        let mut store = CredentialStore::new();
        store.store(SMTP_ACCOUNT, "hunter2").unwrap();

        let revealed = store.reveal(SMTP_ACCOUNT).unwrap();
        assert_eq!(revealed.as_str(), "hunter2");
    }

    #[test]
    fn test_reveal_unknown_account() {
        let store = CredentialStore::new();
        assert!(matches!(
            store.reveal("nope"),
            Err(VenueError::Decryption(_))
        ));
    }

    #[test]
    fn test_store_replaces_previous() {
        let mut store = CredentialStore::new();
        store.store(MAIL_ACCOUNT, "old").unwrap();
        store.store(MAIL_ACCOUNT, "new").unwrap();
        assert_eq!(store.reveal(MAIL_ACCOUNT).unwrap().as_str(), "new");
    }

    #[test]
    fn test_contains_and_forget() {
        let mut store = CredentialStore::new();
        assert!(!store.contains(SMTP_ACCOUNT));
        store.store(SMTP_ACCOUNT, "pw").unwrap();
        assert!(store.contains(SMTP_ACCOUNT));
        store.forget(SMTP_ACCOUNT);
        assert!(!store.contains(SMTP_ACCOUNT));
    }

    #[test]
    fn test_per_store_keys_are_independent() {
        let mut a = CredentialStore::new();
        let b = CredentialStore::new();
        a.store(SMTP_ACCOUNT, "pw").unwrap();

        // The sealed bytes from one store must not open under another's key
        let sealed = a.sealed.get(SMTP_ACCOUNT).unwrap().clone();
        assert!(b.ctx.open(&sealed).is_err());
    }
}
