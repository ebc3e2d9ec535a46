//! Dataseal core library
//!
//! Seals a short secret (typically a dataset URL) for the holder of an RSA
//! private key, so it can travel through a public ledger. The recipient's
//! PEM public key is imported with [`import_public_key`] and the secret is
//! sealed with [`encrypt_envelope`] into a JSON [`Envelope`]:
//! RSA-OAEP (SHA-256) wraps a fresh AES-256 key, AES-256-GCM encrypts the data.
//!
//! ```no_run
//! # fn demo(pem: &str) -> dataseal_sdk_core::Result<()> {
//! let recipient = dataseal_sdk_core::import_public_key(pem)?;
//! let sealed = dataseal_sdk_core::encrypt_envelope(&recipient, "https://example.org/data.h5ad")?;
//! # let _ = sealed;
//! # Ok(())
//! # }
//! ```

pub mod crypto;
pub mod direct;
pub mod envelope;
pub mod error;
pub mod key;
pub mod policy;

// Re-exports
pub use crypto::{CipherProvider, RustCryptoProvider, SecureRandomSource, SeededRandom, SystemRandom};
pub use envelope::operations::{
    encrypt_envelope, seal_locator, seal_locator_with_policy, EnvelopeEncryptor,
};
pub use envelope::{Algorithm, Envelope, ENVELOPE_ALG};
pub use error::{EnvelopeError, KeyRejection, Result, SealError};
pub use key::{import_public_key, import_public_key_with_policy, PublicKeyMaterial};
pub use policy::KeyPolicy;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
