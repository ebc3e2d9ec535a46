//! Sealed envelope wire format
//!
//! An envelope is compact JSON with four fields, emitted in this order:
//!
//! | Field | Content |
//! |-------|---------|
//! | `alg` | always [`ENVELOPE_ALG`] |
//! | `ek`  | base64 RSA-OAEP(SHA-256) encryption of the 32-byte AES key |
//! | `iv`  | base64 12-byte AES-GCM nonce |
//! | `ct`  | base64 AES-256-GCM ciphertext with the 16-byte tag appended |
//!
//! Base64 is the standard alphabet with padding. Decoding is strict: unknown or
//! missing fields, another `alg`, bad base64, a nonce of the wrong length and a
//! `ct` too short to hold the tag are all errors.

pub mod operations;

use crate::crypto::{aead::TAG_LEN, NONCE_LEN};
use crate::error::{EnvelopeError, Result, SealError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canonical algorithm identifier carried in every envelope
pub const ENVELOPE_ALG: &str = "RSA-OAEP+AES-GCM";

/// Envelope algorithm tag. There is exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Algorithm {
    #[serde(rename = "RSA-OAEP+AES-GCM")]
    RsaOaepAesGcm,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RsaOaepAesGcm => ENVELOPE_ALG,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == ENVELOPE_ALG {
            Ok(Self::RsaOaepAesGcm)
        } else {
            Err(EnvelopeError::UnsupportedAlgorithm(s.to_string()))
        }
    }
}

/// Hybrid RSA-OAEP + AES-GCM envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEnvelope")]
pub struct Envelope {
    pub alg: Algorithm,
    #[serde(rename = "ek", serialize_with = "serialize_b64")]
    pub encrypted_key: Vec<u8>,
    #[serde(rename = "iv", serialize_with = "serialize_b64")]
    pub nonce: [u8; NONCE_LEN],
    #[serde(rename = "ct", serialize_with = "serialize_b64")]
    pub ciphertext: Vec<u8>,
}

/// Envelope as it appears on the wire, before field validation
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEnvelope {
    alg: String,
    ek: String,
    iv: String,
    ct: String,
}

impl TryFrom<RawEnvelope> for Envelope {
    type Error = EnvelopeError;

    fn try_from(raw: RawEnvelope) -> std::result::Result<Self, Self::Error> {
        let alg = raw.alg.parse()?;
        let encrypted_key = decode_field("ek", &raw.ek)?;
        let nonce = decode_field("iv", &raw.iv)?
            .try_into()
            .map_err(|_| EnvelopeError::InvalidField {
                field: "iv",
                reason: "expected 12 bytes",
            })?;
        let ciphertext = decode_field("ct", &raw.ct)?;

        if encrypted_key.is_empty() {
            return Err(EnvelopeError::InvalidField {
                field: "ek",
                reason: "empty",
            });
        }
        if ciphertext.len() < TAG_LEN {
            return Err(EnvelopeError::InvalidField {
                field: "ct",
                reason: "shorter than tag",
            });
        }

        Ok(Self {
            alg,
            encrypted_key,
            nonce,
            ciphertext,
        })
    }
}

fn decode_field(field: &'static str, value: &str) -> std::result::Result<Vec<u8>, EnvelopeError> {
    STANDARD
        .decode(value)
        .map_err(|_| EnvelopeError::InvalidField {
            field,
            reason: "invalid base64",
        })
}

fn serialize_b64<S: Serializer, T: AsRef<[u8]>>(
    bytes: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes.as_ref()))
}

impl Envelope {
    pub fn new(encrypted_key: Vec<u8>, nonce: [u8; NONCE_LEN], ciphertext: Vec<u8>) -> Self {
        Self {
            alg: Algorithm::RsaOaepAesGcm,
            encrypted_key,
            nonce,
            ciphertext,
        }
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|_| SealError::EncryptionFailure("serialize"))
    }

    /// Strictly decode an envelope produced by [`Envelope::to_json`]
    pub fn from_json(json: &str) -> std::result::Result<Self, EnvelopeError> {
        let raw: RawEnvelope =
            serde_json::from_str(json).map_err(|e| EnvelopeError::Json(e.to_string()))?;
        Self::try_from(raw)
    }
}

impl FromStr for Envelope {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_json(s)
    }
}
