//! Cryptographic capabilities for Dataseal

pub mod aead;
pub mod oaep;
pub mod provider;

use crate::error::{Result, SealError};
use rand::{rngs::StdRng, CryptoRng, RngCore, SeedableRng};
use zeroize::Zeroizing;

pub use provider::{CipherProvider, RustCryptoProvider};

/// AES-256 session key length in bytes
pub const SESSION_KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes
pub const NONCE_LEN: usize = 12;

/// Source of cryptographically secure random bytes.
///
/// Every random byte the sealing path consumes (session key, nonce, OAEP seed)
/// is drawn from one of these, so tests can substitute a deterministic source.
pub trait SecureRandomSource {
    /// Fill `buf` entirely or fail.
    fn fill(&mut self, buf: &mut [u8]) -> Result<()>;
}

impl<T: SecureRandomSource + ?Sized> SecureRandomSource for &mut T {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).fill(buf)
    }
}

/// Operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRandom;

impl SecureRandomSource for SystemRandom {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        getrandom::getrandom(buf).map_err(|_| SealError::EncryptionFailure("entropy"))
    }
}

/// Deterministic source for tests and benchmarks. Never use it to seal real data.
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl SecureRandomSource for SeededRandom {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        self.0
            .try_fill_bytes(buf)
            .map_err(|_| SealError::EncryptionFailure("entropy"))
    }
}

/// Presents a [`SecureRandomSource`] as a `rand_core` generator.
///
/// `RngCore::fill_bytes` cannot report errors, so a failure is latched and
/// must be collected with [`RngAdapter::finish`] before any output produced
/// with this adapter is used.
pub struct RngAdapter<'a, R: SecureRandomSource + ?Sized> {
    source: &'a mut R,
    failed: bool,
}

impl<'a, R: SecureRandomSource + ?Sized> RngAdapter<'a, R> {
    pub fn new(source: &'a mut R) -> Self {
        Self {
            source,
            failed: false,
        }
    }

    /// Returns an error if the underlying source failed at any point.
    pub fn finish(self) -> Result<()> {
        if self.failed {
            Err(SealError::EncryptionFailure("entropy"))
        } else {
            Ok(())
        }
    }
}

impl<R: SecureRandomSource + ?Sized> RngCore for RngAdapter<'_, R> {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.fill_bytes(&mut bytes);
        u32::from_le_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_le_bytes(bytes)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if self.source.fill(dest).is_err() {
            dest.fill(0);
            self.failed = true;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.source.fill(dest).map_err(|e| {
            self.failed = true;
            rand::Error::new(e)
        })
    }
}

impl<R: SecureRandomSource + ?Sized> CryptoRng for RngAdapter<'_, R> {}

/// Generate a fresh AES-256 session key
pub fn generate_session_key<R: SecureRandomSource + ?Sized>(
    random: &mut R,
) -> Result<Zeroizing<[u8; SESSION_KEY_LEN]>> {
    let mut key = Zeroizing::new([0u8; SESSION_KEY_LEN]);
    random.fill(&mut key[..])?;
    Ok(key)
}

/// Generate a random nonce for AEAD
pub fn generate_nonce<R: SecureRandomSource + ?Sized>(random: &mut R) -> Result<[u8; NONCE_LEN]> {
    let mut nonce = [0u8; NONCE_LEN];
    random.fill(&mut nonce)?;
    Ok(nonce)
}


#[cfg(test)]
mod tests {
    use super::testing::ExhaustedRandom;
    use super::*;

    #[test]
    fn test_system_random_fills() {
        let a = generate_session_key(&mut SystemRandom).unwrap();
        let b = generate_session_key(&mut SystemRandom).unwrap();
        assert_ne!(*a, *b);
        assert_ne!(*a, [0u8; SESSION_KEY_LEN]);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let n1 = generate_nonce(&mut SeededRandom::new(7)).unwrap();
        let n2 = generate_nonce(&mut SeededRandom::new(7)).unwrap();
        let n3 = generate_nonce(&mut SeededRandom::new(8)).unwrap();
        assert_eq!(n1, n2);
        assert_ne!(n1, n3);
    }

    #[test]
    fn test_adapter_latches_failure() {
        let mut source = ExhaustedRandom { remaining: 4 };
        let mut rng = RngAdapter::new(&mut source);
        let _ = rng.next_u32();
        assert!(rng.try_fill_bytes(&mut [0u8; 1]).is_err());
        let _ = rng.next_u64();
        assert_eq!(
            rng.finish(),
            Err(SealError::EncryptionFailure("entropy"))
        );
    }

    #[test]
    fn test_adapter_ok_when_source_healthy() {
        let mut source = SeededRandom::new(1);
        let mut rng = RngAdapter::new(&mut source);
        let mut buf = [0u8; 64];
        rng.fill_bytes(&mut buf);
        assert!(rng.finish().is_ok());
        assert_ne!(buf, [0u8; 64]);
    }
}
