//! Reference opener for sealed envelopes, used only to check sealing.

#![allow(dead_code)]

use aes_gcm::{aead::Aead as _, Aes256Gcm, Key, KeyInit, Nonce};
use dataseal_sdk_core::Envelope;
use rsa::{pkcs8::DecodePrivateKey, Oaep, RsaPrivateKey};
use sha2::Sha256;

pub const RECIPIENT_A_PUBLIC: &str = include_str!("../fixtures/recipient_a_public.pem");
pub const RECIPIENT_A_PRIVATE: &str = include_str!("../fixtures/recipient_a_private.pem");
pub const RECIPIENT_B_PUBLIC: &str = include_str!("../fixtures/recipient_b_public.pem");
pub const RECIPIENT_B_PRIVATE: &str = include_str!("../fixtures/recipient_b_private.pem");
pub const RSA_1024_PUBLIC: &str = include_str!("../fixtures/rsa1024_public.pem");
pub const RSA_3072_PUBLIC: &str = include_str!("../fixtures/rsa3072_public.pem");
pub const P256_PUBLIC: &str = include_str!("../fixtures/p256_public.pem");

#[derive(Debug, PartialEq, Eq)]
pub enum OpenError {
    Envelope,
    KeyUnwrap,
    SessionKeyLength,
    Authentication,
    Utf8,
}

pub fn private_key(pem: &str) -> RsaPrivateKey {
    RsaPrivateKey::from_pkcs8_pem(pem).expect("fixture private key")
}

/// Recover the AES session key from `ek`.
pub fn unwrap_session_key(private_pem: &str, envelope: &Envelope) -> Result<Vec<u8>, OpenError> {
    let session_key = private_key(private_pem)
        .decrypt(Oaep::new::<Sha256>(), &envelope.encrypted_key)
        .map_err(|_| OpenError::KeyUnwrap)?;
    if session_key.len() != 32 {
        return Err(OpenError::SessionKeyLength);
    }
    Ok(session_key)
}

/// Open `ct` under an already unwrapped session key, verifying the tag.
pub fn open_with_session_key(session_key: &[u8], envelope: &Envelope) -> Result<Vec<u8>, OpenError> {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(session_key))
        .decrypt(Nonce::from_slice(&envelope.nonce), envelope.ciphertext.as_slice())
        .map_err(|_| OpenError::Authentication)
}

/// Unwrap the session key and open the ciphertext.
pub fn open_envelope(private_pem: &str, envelope: &Envelope) -> Result<Vec<u8>, OpenError> {
    let session_key = unwrap_session_key(private_pem, envelope)?;
    open_with_session_key(&session_key, envelope)
}

/// Full decode-and-open of a serialized envelope.
pub fn open(private_pem: &str, sealed: &str) -> Result<String, OpenError> {
    let envelope = Envelope::from_json(sealed).map_err(|_| OpenError::Envelope)?;
    let plaintext = open_envelope(private_pem, &envelope)?;
    String::from_utf8(plaintext).map_err(|_| OpenError::Utf8)
}
