//! Direct RSA-OAEP encryption without an envelope
//!
//! Older submissions stored the locator as a bare base64 RSA-OAEP (SHA-256)
//! ciphertext. Only plaintexts up to [`PublicKeyMaterial::max_oaep_message_len`]
//! bytes fit; anything longer needs [`crate::envelope`].

use crate::crypto::{oaep, SecureRandomSource, SystemRandom};
use crate::error::Result;
use crate::key::{import_public_key, PublicKeyMaterial};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Encrypt `plaintext` directly under `recipient`, drawing the OAEP seed from `random`.
pub fn rsa_oaep_encrypt<R: SecureRandomSource + ?Sized>(
    recipient: &PublicKeyMaterial,
    random: &mut R,
    plaintext: &str,
) -> Result<String> {
    let ciphertext = oaep::rsa_oaep_sha256_encrypt(recipient, random, plaintext.as_bytes())?;
    Ok(STANDARD.encode(ciphertext))
}

/// Import `pem` and return the base64 RSA-OAEP ciphertext of `plaintext`
pub fn rsa_oaep_encrypt_to_base64(pem: &str, plaintext: &str) -> Result<String> {
    let recipient = import_public_key(pem)?;
    rsa_oaep_encrypt(&recipient, &mut SystemRandom, plaintext)
}
