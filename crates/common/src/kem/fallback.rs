//! Shape-only fallback provider
//!
//! Stands in for the real primitive when the `ml-kem` feature is compiled
//! out. Keypairs are fixed-length random bytes, the ciphertext IS the shared
//! secret, and decapsulation returns its ciphertext input verbatim. This
//! preserves the call shape (types, lengths, success path) and nothing else:
//! the variant provides **no cryptographic security** and may only be
//! selected through an explicit startup opt-in.

use super::{
    Ciphertext, Encapsulation, KemError, KemProvider, KeyPair, PublicKey, SecretKey, SharedSecret,
    PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, SHARED_SECRET_SIZE,
};

/// Insecure stand-in provider
///
/// Validates input lengths the same way the real variant does, so callers
/// observe uniform rejection behavior. Its ciphertexts are
/// [`SHARED_SECRET_SIZE`] bytes long, not [`super::CIPHERTEXT_SIZE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackProvider;

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buff = [0; N];
    getrandom::getrandom(&mut buff).expect("failed to generate random bytes");
    buff
}

impl KemProvider for FallbackProvider {
    fn generate_keypair(&self) -> Result<KeyPair, KemError> {
        Ok(KeyPair {
            public_key: PublicKey::from(random_bytes::<PUBLIC_KEY_SIZE>()),
            secret_key: SecretKey::from(random_bytes::<SECRET_KEY_SIZE>()),
        })
    }

    fn encapsulate(&self, public_key: &[u8]) -> Result<Encapsulation, KemError> {
        if public_key.len() != PUBLIC_KEY_SIZE {
            return Err(KemError::InvalidPublicKey {
                expected: PUBLIC_KEY_SIZE,
                actual: public_key.len(),
            });
        }
        let secret = random_bytes::<SHARED_SECRET_SIZE>();
        Ok(Encapsulation {
            shared_secret: secret.into(),
            ciphertext: Ciphertext::from(secret.to_vec()),
        })
    }

    fn decapsulate(&self, ciphertext: &[u8], secret_key: &[u8]) -> Result<SharedSecret, KemError> {
        if ciphertext.len() != SHARED_SECRET_SIZE {
            return Err(KemError::InvalidCiphertext {
                expected: SHARED_SECRET_SIZE,
                actual: ciphertext.len(),
            });
        }
        if secret_key.len() != SECRET_KEY_SIZE {
            return Err(KemError::InvalidSecretKey {
                expected: SECRET_KEY_SIZE,
                actual: secret_key.len(),
            });
        }
        let mut secret = [0; SHARED_SECRET_SIZE];
        secret.copy_from_slice(ciphertext);
        Ok(secret.into())
    }
}
