//! RSA-OAEP (SHA-256) encryption under a recipient public key

use super::{RngAdapter, SecureRandomSource};
use crate::error::{Result, SealError};
use crate::key::PublicKeyMaterial;
use rsa::Oaep;
use sha2::Sha256;

/// Bytes of OAEP overhead with SHA-256 as both main and MGF1 hash: `2 * hLen + 2`
pub const OAEP_SHA256_OVERHEAD: usize = 2 * 32 + 2;

/// Largest message that fits under OAEP-SHA-256 for a modulus of `modulus_len` bytes.
pub fn max_message_len(modulus_len: usize) -> usize {
    modulus_len.saturating_sub(OAEP_SHA256_OVERHEAD)
}

/// Encrypt `message` with RSA-OAEP, SHA-256 for both hashes and an empty label.
///
/// The OAEP seed is drawn from `random`.
pub fn rsa_oaep_sha256_encrypt<R: SecureRandomSource + ?Sized>(
    key: &PublicKeyMaterial,
    random: &mut R,
    message: &[u8],
) -> Result<Vec<u8>> {
    if message.len() > max_message_len(key.modulus_len()) {
        return Err(SealError::EncryptionFailure("rsa-oaep message too long"));
    }

    let mut rng = RngAdapter::new(random);
    let ciphertext = key
        .rsa()
        .encrypt(&mut rng, Oaep::new::<Sha256>(), message)
        .map_err(|_| SealError::EncryptionFailure("rsa-oaep"))?;
    rng.finish()?;

    Ok(ciphertext)
}
