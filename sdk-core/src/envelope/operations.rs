//! High-level envelope operations

use crate::{
    crypto::{self, CipherProvider, RustCryptoProvider, SecureRandomSource, SystemRandom},
    envelope::Envelope,
    error::Result,
    key::{self, PublicKeyMaterial},
    policy::KeyPolicy,
};

/// Seals plaintext into [`Envelope`]s for a recipient public key.
///
/// Holds no key material between calls; each call draws a fresh session key
/// and nonce from `random`.
pub struct EnvelopeEncryptor<R = SystemRandom, P = RustCryptoProvider> {
    random: R,
    provider: P,
}

impl EnvelopeEncryptor {
    /// System randomness with the RustCrypto backend
    pub fn new() -> Self {
        Self::with_parts(SystemRandom, RustCryptoProvider)
    }
}

impl Default for EnvelopeEncryptor {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SecureRandomSource, P: CipherProvider> EnvelopeEncryptor<R, P> {
    pub fn with_parts(random: R, provider: P) -> Self {
        Self { random, provider }
    }

    /// Encrypt `plaintext` for `recipient` and return the structured envelope
    pub fn seal(&mut self, recipient: &PublicKeyMaterial, plaintext: &str) -> Result<Envelope> {
        let session_key = crypto::generate_session_key(&mut self.random)?;
        let nonce = crypto::generate_nonce(&mut self.random)?;

        let ciphertext = self
            .provider
            .seal(&session_key, &nonce, plaintext.as_bytes())?;
        let encrypted_key = self
            .provider
            .wrap_key(recipient, &mut self.random, &session_key)?;

        tracing::debug!(
            recipient = %recipient.fingerprint(),
            ek_len = encrypted_key.len(),
            ct_len = ciphertext.len(),
            "sealed envelope"
        );

        Ok(Envelope::new(encrypted_key, nonce, ciphertext))
    }

    /// Encrypt `plaintext` for `recipient` and return the serialized envelope
    pub fn encrypt_envelope(
        &mut self,
        recipient: &PublicKeyMaterial,
        plaintext: &str,
    ) -> Result<String> {
        self.seal(recipient, plaintext)?.to_json()
    }
}

/// Seal `plaintext` for `recipient` using system randomness
pub fn encrypt_envelope(recipient: &PublicKeyMaterial, plaintext: &str) -> Result<String> {
    EnvelopeEncryptor::new().encrypt_envelope(recipient, plaintext)
}

/// Import `pem` and seal `plaintext` for it in one step
pub fn seal_locator(pem: &str, plaintext: &str) -> Result<String> {
    let recipient = key::import_public_key(pem)?;
    encrypt_envelope(&recipient, plaintext)
}

/// [`seal_locator`] with `policy` applied to both the key and the plaintext
pub fn seal_locator_with_policy(pem: &str, plaintext: &str, policy: &KeyPolicy) -> Result<String> {
    let recipient = key::import_public_key_with_policy(pem, policy)?;
    policy.validate_plaintext(plaintext)?;
    encrypt_envelope(&recipient, plaintext)
}
