//! Key encapsulation mechanism (KEM) provider capability
//!
//! This module wraps the post-quantum primitive behind a minimal
//! three-operation interface:
//!
//! - **Keypair generation**: a fresh, independently random keypair per call
//! - **Encapsulation**: derive a shared secret against a public key,
//!   producing a ciphertext the key owner can open
//! - **Decapsulation**: recover the shared secret from the ciphertext with
//!   the secret key
//!
//! All inputs and outputs here are raw bytes; text encoding belongs to the
//! layer above. Two provider variants exist: the real ML-KEM-512 backend
//! (cargo feature `ml-kem`, on by default) and a shape-only fallback with no
//! cryptographic security. Which one serves a process is decided exactly
//! once at startup via [`Backend::select`] and never changes afterwards.

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

mod fallback;
#[cfg(feature = "ml-kem")]
mod ml_kem;

pub use fallback::FallbackProvider;
#[cfg(feature = "ml-kem")]
pub use ml_kem::MlKemProvider;

/// Size of an ML-KEM-512 public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 800;
/// Size of an ML-KEM-512 secret key in bytes
pub const SECRET_KEY_SIZE: usize = 1632;
/// Size of an ML-KEM-512 ciphertext in bytes
pub const CIPHERTEXT_SIZE: usize = 768;
/// Size of the shared secret in bytes (256 bits)
pub const SHARED_SECRET_SIZE: usize = 32;

/// Errors that can occur during KEM operations
#[derive(Debug, thiserror::Error)]
pub enum KemError {
    #[error("post-quantum KEM primitive is not available in this build")]
    Unavailable,
    #[error("invalid public key: expected {expected} bytes, got {actual}")]
    InvalidPublicKey { expected: usize, actual: usize },
    #[error("invalid secret key: expected {expected} bytes, got {actual}")]
    InvalidSecretKey { expected: usize, actual: usize },
    #[error("invalid ciphertext: expected {expected} bytes, got {actual}")]
    InvalidCiphertext { expected: usize, actual: usize },
}

/// Public half of a KEM keypair
///
/// Anyone holding this key can encapsulate a shared secret against it; only
/// the matching [`SecretKey`] can recover that secret. No relationship
/// between the two halves is tracked after generation - the caller is solely
/// responsible for associating them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl From<[u8; PUBLIC_KEY_SIZE]> for PublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        PublicKey(bytes)
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = KemError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(KemError::InvalidPublicKey {
                expected: PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut buff = [0; PUBLIC_KEY_SIZE];
        buff.copy_from_slice(bytes);
        Ok(buff.into())
    }
}

impl PublicKey {
    /// Get a reference to the raw key bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

/// Secret half of a KEM keypair
///
/// Never leaves the process except through the caller that requested its
/// generation. Contents are wiped from memory on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; SECRET_KEY_SIZE]);

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(..)")
    }
}

impl From<[u8; SECRET_KEY_SIZE]> for SecretKey {
    fn from(bytes: [u8; SECRET_KEY_SIZE]) -> Self {
        SecretKey(bytes)
    }
}

impl TryFrom<&[u8]> for SecretKey {
    type Error = KemError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != SECRET_KEY_SIZE {
            return Err(KemError::InvalidSecretKey {
                expected: SECRET_KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut buff = [0; SECRET_KEY_SIZE];
        buff.copy_from_slice(bytes);
        Ok(buff.into())
    }
}

impl SecretKey {
    /// Get a reference to the raw key bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

/// Ciphertext carrying an encapsulated shared secret
///
/// Opaque to everyone but the holder of the matching secret key. The length
/// is fixed per provider variant, not across variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext(Vec<u8>);

impl From<Vec<u8>> for Ciphertext {
    fn from(bytes: Vec<u8>) -> Self {
        Ciphertext(bytes)
    }
}

impl Ciphertext {
    /// Get a reference to the raw ciphertext bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A 256-bit shared secret established through encapsulation
///
/// Wiped from memory on drop. Equality is constant-time so that comparing
/// secrets never leaks where they first differ.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_SIZE]);

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret(..)")
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SharedSecret {}

impl From<[u8; SHARED_SECRET_SIZE]> for SharedSecret {
    fn from(bytes: [u8; SHARED_SECRET_SIZE]) -> Self {
        SharedSecret(bytes)
    }
}

impl SharedSecret {
    /// Get a reference to the raw secret bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

/// A freshly generated keypair
///
/// Both halves are handed to the caller; nothing is retained server-side.
#[derive(Debug)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub secret_key: SecretKey,
}

/// Result of encapsulating against a public key
#[derive(Debug)]
pub struct Encapsulation {
    pub shared_secret: SharedSecret,
    pub ciphertext: Ciphertext,
}

/// The three-operation KEM capability
///
/// Every operation either returns a fully-populated result or fails
/// atomically; callers never observe partial results. Implementations hold
/// no mutable state, so calls may run fully in parallel.
pub trait KemProvider {
    /// Generate a fresh, independently random keypair.
    fn generate_keypair(&self) -> Result<KeyPair, KemError>;

    /// Encapsulate a shared secret against `public_key`.
    ///
    /// # Errors
    ///
    /// Returns [`KemError::InvalidPublicKey`] if the key is not exactly the
    /// length the parameter set requires.
    fn encapsulate(&self, public_key: &[u8]) -> Result<Encapsulation, KemError>;

    /// Recover the shared secret from `ciphertext` using `secret_key`.
    ///
    /// # Errors
    ///
    /// Returns [`KemError::InvalidCiphertext`] or
    /// [`KemError::InvalidSecretKey`] when the respective input has the
    /// wrong length.
    fn decapsulate(&self, ciphertext: &[u8], secret_key: &[u8]) -> Result<SharedSecret, KemError>;
}

/// The provider variant a process runs with
///
/// Selected once at startup and immutable for the process lifetime. The
/// value is passed explicitly into the service constructor rather than read
/// from a global, so tests can pin either variant directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Real ML-KEM-512 primitive
    #[cfg(feature = "ml-kem")]
    MlKem512,
    /// Shape-only stand-in with no cryptographic security
    Fallback,
}

impl Backend {
    /// Select the backend for this process.
    ///
    /// The real primitive wins whenever it is compiled in. Without it, the
    /// insecure fallback is used only if `allow_fallback` is set; otherwise
    /// selection fails with [`KemError::Unavailable`]. Callers are expected
    /// to make the outcome observable (log it) before serving requests.
    pub fn select(allow_fallback: bool) -> Result<Self, KemError> {
        #[cfg(feature = "ml-kem")]
        {
            let _ = allow_fallback;
            Ok(Backend::MlKem512)
        }
        #[cfg(not(feature = "ml-kem"))]
        {
            if allow_fallback {
                Ok(Backend::Fallback)
            } else {
                Err(KemError::Unavailable)
            }
        }
    }

    /// Construct a transient provider for a single call.
    pub fn provider(&self) -> Provider {
        match self {
            #[cfg(feature = "ml-kem")]
            Backend::MlKem512 => Provider::MlKem512(MlKemProvider),
            Backend::Fallback => Provider::Fallback(FallbackProvider),
        }
    }

    /// Whether the active variant provides real cryptographic security.
    pub fn is_secure(&self) -> bool {
        match self {
            #[cfg(feature = "ml-kem")]
            Backend::MlKem512 => true,
            Backend::Fallback => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "ml-kem")]
            Backend::MlKem512 => "ml-kem-512",
            Backend::Fallback => "fallback",
        }
    }
}

/// Provider dispatch over the two variants
#[derive(Debug, Clone, Copy)]
pub enum Provider {
    #[cfg(feature = "ml-kem")]
    MlKem512(MlKemProvider),
    Fallback(FallbackProvider),
}

impl KemProvider for Provider {
    fn generate_keypair(&self) -> Result<KeyPair, KemError> {
        match self {
            #[cfg(feature = "ml-kem")]
            Provider::MlKem512(provider) => provider.generate_keypair(),
            Provider::Fallback(provider) => provider.generate_keypair(),
        }
    }

    fn encapsulate(&self, public_key: &[u8]) -> Result<Encapsulation, KemError> {
        match self {
            #[cfg(feature = "ml-kem")]
            Provider::MlKem512(provider) => provider.encapsulate(public_key),
            Provider::Fallback(provider) => provider.encapsulate(public_key),
        }
    }

    fn decapsulate(&self, ciphertext: &[u8], secret_key: &[u8]) -> Result<SharedSecret, KemError> {
        match self {
            #[cfg(feature = "ml-kem")]
            Provider::MlKem512(provider) => provider.decapsulate(ciphertext, secret_key),
            Provider::Fallback(provider) => provider.decapsulate(ciphertext, secret_key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "ml-kem")]
    fn test_select_prefers_real_primitive() {
        assert_eq!(Backend::select(false).unwrap(), Backend::MlKem512);
        assert_eq!(Backend::select(true).unwrap(), Backend::MlKem512);
    }

    #[test]
    #[cfg(not(feature = "ml-kem"))]
    fn test_select_requires_explicit_fallback_opt_in() {
        assert!(matches!(Backend::select(false), Err(KemError::Unavailable)));
        assert_eq!(Backend::select(true).unwrap(), Backend::Fallback);
    }

    #[test]
    fn test_backend_reports_fallback_as_insecure() {
        assert!(!Backend::Fallback.is_secure());
        assert_eq!(Backend::Fallback.name(), "fallback");
    }

    #[test]
    #[cfg(feature = "ml-kem")]
    fn test_backend_reports_real_primitive_as_secure() {
        assert!(Backend::MlKem512.is_secure());
        assert_eq!(Backend::MlKem512.name(), "ml-kem-512");
    }

    #[test]
    fn test_public_key_rejects_wrong_length() {
        let result = PublicKey::try_from(&[0u8; PUBLIC_KEY_SIZE - 1][..]);
        assert!(matches!(
            result,
            Err(KemError::InvalidPublicKey {
                expected: PUBLIC_KEY_SIZE,
                actual
            }) if actual == PUBLIC_KEY_SIZE - 1
        ));
    }

    #[test]
    fn test_secret_key_rejects_wrong_length() {
        let result = SecretKey::try_from(&[0u8; SECRET_KEY_SIZE + 1][..]);
        assert!(matches!(
            result,
            Err(KemError::InvalidSecretKey { .. })
        ));
    }

    #[test]
    fn test_shared_secret_equality() {
        let a = SharedSecret::from([7u8; SHARED_SECRET_SIZE]);
        let b = SharedSecret::from([7u8; SHARED_SECRET_SIZE]);
        let c = SharedSecret::from([8u8; SHARED_SECRET_SIZE]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = SharedSecret::from([9u8; SHARED_SECRET_SIZE]);
        assert_eq!(format!("{:?}", secret), "SharedSecret(..)");
    }
}
