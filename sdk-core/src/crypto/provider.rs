//! Pluggable cipher backend

use super::{aead, oaep, SecureRandomSource, NONCE_LEN, SESSION_KEY_LEN};
use crate::error::Result;
use crate::key::PublicKeyMaterial;

/// The two primitives an envelope needs: bulk AEAD and key wrapping.
pub trait CipherProvider {
    /// AES-256-GCM encrypt, tag appended to the returned ciphertext.
    fn seal(
        &self,
        key: &[u8; SESSION_KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>>;

    /// RSA-OAEP (SHA-256) encrypt the raw session key under `recipient`.
    fn wrap_key<R: SecureRandomSource + ?Sized>(
        &self,
        recipient: &PublicKeyMaterial,
        random: &mut R,
        session_key: &[u8; SESSION_KEY_LEN],
    ) -> Result<Vec<u8>>;
}

/// Backend built on the RustCrypto `aes-gcm` and `rsa` crates
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl CipherProvider for RustCryptoProvider {
    fn seal(
        &self,
        key: &[u8; SESSION_KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        aead::aes_256_gcm_encrypt(key, nonce, plaintext)
    }

    fn wrap_key<R: SecureRandomSource + ?Sized>(
        &self,
        recipient: &PublicKeyMaterial,
        random: &mut R,
        session_key: &[u8; SESSION_KEY_LEN],
    ) -> Result<Vec<u8>> {
        oaep::rsa_oaep_sha256_encrypt(recipient, random, session_key)
    }
}
