//! Dataseal error types

use std::fmt;
use thiserror::Error;

/// Stage at which a recipient public key was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRejection {
    /// Missing or malformed `BEGIN/END PUBLIC KEY` armour.
    NotPem,
    /// Armoured body is not valid base64.
    Base64,
    /// Decoded bytes are not a DER SubjectPublicKeyInfo.
    NotSpki,
    /// SubjectPublicKeyInfo names an algorithm other than rsaEncryption,
    /// or the RSA key inside it is unusable.
    NotRsa,
    /// Key parsed fine but is refused by the configured [`crate::KeyPolicy`].
    PolicyViolation,
}

impl fmt::Display for KeyRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NotPem => "not a PEM public key block",
            Self::Base64 => "PEM body is not valid base64",
            Self::NotSpki => "not a SubjectPublicKeyInfo structure",
            Self::NotRsa => "not an RSA public key",
            Self::PolicyViolation => "rejected by key policy",
        };
        f.write_str(reason)
    }
}

/// Errors surfaced by key import and envelope sealing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SealError {
    /// The recipient key cannot be used. Not retryable: the caller needs a corrected key.
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(KeyRejection),

    /// A cryptographic primitive failed. No partial envelope exists; retrying is safe.
    #[error("Encryption failure: {0}")]
    EncryptionFailure(&'static str),
}

impl SealError {
    /// Whether repeating the whole operation can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EncryptionFailure(_))
    }
}

/// Errors from decoding a serialized envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("Malformed envelope: {0}")]
    Json(String),

    #[error("Unsupported envelope algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid envelope field `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, SealError>;
