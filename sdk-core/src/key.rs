//! Recipient public key import
//!
//! Accepts exactly one PEM `PUBLIC KEY` block carrying a DER SubjectPublicKeyInfo
//! for an RSA key. The resulting [`PublicKeyMaterial`] can only encrypt with
//! RSA-OAEP (SHA-256); there is no verify or decrypt surface.

use crate::crypto::oaep;
use crate::error::{KeyRejection, Result, SealError};
use crate::policy::KeyPolicy;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use rsa::pkcs8::spki::{der::Decode, SubjectPublicKeyInfoRef};
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use sha2::{Digest, Sha256};
use std::fmt;

pub const PEM_BEGIN: &str = "-----BEGIN PUBLIC KEY-----";
pub const PEM_END: &str = "-----END PUBLIC KEY-----";

/// Standard alphabet, `=` padding optional, matching what browsers' `atob` accepts
const PEM_BODY: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Padding the imported key is bound to
pub const PADDING: &str = "RSA-OAEP";

/// Main and MGF1 hash the imported key is bound to
pub const HASH: &str = "SHA-256";

/// Parsed, encrypt-only RSA public key
#[derive(Clone)]
pub struct PublicKeyMaterial {
    spki_der: Vec<u8>,
    key: RsaPublicKey,
}

impl PublicKeyMaterial {
    /// Raw SubjectPublicKeyInfo DER this key was decoded from
    pub fn spki_der(&self) -> &[u8] {
        &self.spki_der
    }

    pub fn modulus_bits(&self) -> usize {
        self.key.n().bits()
    }

    /// Modulus length in bytes; also the length of every OAEP ciphertext
    pub fn modulus_len(&self) -> usize {
        self.key.size()
    }

    pub fn padding(&self) -> &'static str {
        PADDING
    }

    pub fn hash(&self) -> &'static str {
        HASH
    }

    /// Largest message this key can encrypt directly under OAEP-SHA-256
    pub fn max_oaep_message_len(&self) -> usize {
        oaep::max_message_len(self.modulus_len())
    }

    /// Lowercase hex SHA-256 of the SPKI DER
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.spki_der))
    }

    pub(crate) fn rsa(&self) -> &RsaPublicKey {
        &self.key
    }
}

impl fmt::Debug for PublicKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKeyMaterial")
            .field("fingerprint", &self.fingerprint())
            .field("modulus_bits", &self.modulus_bits())
            .field("padding", &PADDING)
            .field("hash", &HASH)
            .finish()
    }
}

/// Import a PEM-armoured SPKI RSA public key for RSA-OAEP (SHA-256) encryption.
pub fn import_public_key(pem: &str) -> Result<PublicKeyMaterial> {
    let der = pem_to_der(pem).map_err(reject)?;
    let key = der_to_rsa(&der).map_err(reject)?;

    let material = PublicKeyMaterial { spki_der: der, key };
    tracing::debug!(
        fingerprint = %material.fingerprint(),
        modulus_bits = material.modulus_bits(),
        "imported recipient public key"
    );
    Ok(material)
}

/// [`import_public_key`] followed by `policy` validation.
pub fn import_public_key_with_policy(pem: &str, policy: &KeyPolicy) -> Result<PublicKeyMaterial> {
    let material = import_public_key(pem)?;
    policy.validate_key(&material)?;
    Ok(material)
}

fn reject(stage: KeyRejection) -> SealError {
    tracing::warn!(reason = %stage, "rejected recipient public key");
    SealError::InvalidKeyMaterial(stage)
}

/// Strip the armour and all whitespace, then base64-decode the body.
fn pem_to_der(pem: &str) -> std::result::Result<Vec<u8>, KeyRejection> {
    let body = pem
        .trim()
        .strip_prefix(PEM_BEGIN)
        .and_then(|rest| rest.strip_suffix(PEM_END))
        .ok_or(KeyRejection::NotPem)?;

    // A second block or stray armour of another type
    if body.contains("-----") {
        return Err(KeyRejection::NotPem);
    }

    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(KeyRejection::NotPem);
    }

    PEM_BODY.decode(compact).map_err(|_| KeyRejection::Base64)
}

fn der_to_rsa(der: &[u8]) -> std::result::Result<RsaPublicKey, KeyRejection> {
    let spki = SubjectPublicKeyInfoRef::from_der(der).map_err(|_| KeyRejection::NotSpki)?;
    if spki.algorithm.oid != rsa::pkcs1::ALGORITHM_OID {
        return Err(KeyRejection::NotRsa);
    }
    RsaPublicKey::from_public_key_der(der).map_err(|_| KeyRejection::NotRsa)
}
