//! AES-256-GCM content encryption

use super::{NONCE_LEN, SESSION_KEY_LEN};
use crate::error::{Result, SealError};
use aes_gcm::{
    aead::{Aead as _, KeyInit},
    Aes256Gcm, Key, Nonce,
};

/// GCM authentication tag length, appended to every ciphertext
pub const TAG_LEN: usize = 16;

/// Encrypt with AES-256-GCM. The output is `ciphertext || tag`; no associated data is bound.
pub fn aes_256_gcm_encrypt(
    key: &[u8; SESSION_KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| SealError::EncryptionFailure("aead"))
}
