//! Sealing policy configuration

use crate::error::{KeyRejection, Result, SealError};
use crate::key::PublicKeyMaterial;
use serde::{Deserialize, Serialize};

/// Smallest modulus accepted by [`KeyPolicy::default`]
pub const DEFAULT_MIN_MODULUS_BITS: usize = 2048;

/// Caller-side limits applied on top of the core sealing rules.
///
/// The core functions never consult a policy on their own; the caller opts in
/// through [`crate::key::import_public_key_with_policy`] or
/// [`crate::envelope::operations::seal_locator_with_policy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyPolicy {
    pub min_modulus_bits: usize,
    /// Ledger fields are costly; cap the plaintext when set.
    pub max_plaintext_bytes: Option<usize>,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self {
            min_modulus_bits: DEFAULT_MIN_MODULUS_BITS,
            max_plaintext_bytes: None,
        }
    }
}

impl KeyPolicy {
    /// Validate a recipient key against policy
    pub fn validate_key(&self, key: &PublicKeyMaterial) -> Result<()> {
        if key.modulus_bits() < self.min_modulus_bits {
            tracing::warn!(
                modulus_bits = key.modulus_bits(),
                min_modulus_bits = self.min_modulus_bits,
                "recipient key below policy minimum"
            );
            return Err(SealError::InvalidKeyMaterial(KeyRejection::PolicyViolation));
        }
        Ok(())
    }

    /// Validate a plaintext against policy
    pub fn validate_plaintext(&self, plaintext: &str) -> Result<()> {
        match self.max_plaintext_bytes {
            Some(max) if plaintext.len() > max => {
                Err(SealError::EncryptionFailure("plaintext-too-large"))
            }
            _ => Ok(()),
        }
    }
}
