//! Real provider backed by ML-KEM-512 (FIPS 203)
//!
//! Delegates to the PQClean-derived `pqcrypto-mlkem` implementation. All
//! length validation happens here, before bytes reach the primitive, so the
//! primitive only ever sees well-formed input.

use pqcrypto_mlkem::mlkem512;
use pqcrypto_traits::kem::{
    Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _,
};

use super::{
    Ciphertext, Encapsulation, KemError, KemProvider, KeyPair, PublicKey, SecretKey, SharedSecret,
    CIPHERTEXT_SIZE, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, SHARED_SECRET_SIZE,
};

/// ML-KEM-512 provider
///
/// Stateless; a value is constructed per call and holds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct MlKemProvider;

impl KemProvider for MlKemProvider {
    fn generate_keypair(&self) -> Result<KeyPair, KemError> {
        let (pk, sk) = mlkem512::keypair();
        Ok(KeyPair {
            public_key: PublicKey::try_from(pk.as_bytes())?,
            secret_key: SecretKey::try_from(sk.as_bytes())?,
        })
    }

    fn encapsulate(&self, public_key: &[u8]) -> Result<Encapsulation, KemError> {
        if public_key.len() != PUBLIC_KEY_SIZE {
            return Err(KemError::InvalidPublicKey {
                expected: PUBLIC_KEY_SIZE,
                actual: public_key.len(),
            });
        }
        let pk = mlkem512::PublicKey::from_bytes(public_key).map_err(|_| {
            KemError::InvalidPublicKey {
                expected: PUBLIC_KEY_SIZE,
                actual: public_key.len(),
            }
        })?;

        let (ss, ct) = mlkem512::encapsulate(&pk);
        let mut secret = [0u8; SHARED_SECRET_SIZE];
        secret.copy_from_slice(ss.as_bytes());

        Ok(Encapsulation {
            shared_secret: secret.into(),
            ciphertext: Ciphertext::from(ct.as_bytes().to_vec()),
        })
    }

    fn decapsulate(&self, ciphertext: &[u8], secret_key: &[u8]) -> Result<SharedSecret, KemError> {
        if ciphertext.len() != CIPHERTEXT_SIZE {
            return Err(KemError::InvalidCiphertext {
                expected: CIPHERTEXT_SIZE,
                actual: ciphertext.len(),
            });
        }
        if secret_key.len() != SECRET_KEY_SIZE {
            return Err(KemError::InvalidSecretKey {
                expected: SECRET_KEY_SIZE,
                actual: secret_key.len(),
            });
        }
        let ct = mlkem512::Ciphertext::from_bytes(ciphertext).map_err(|_| {
            KemError::InvalidCiphertext {
                expected: CIPHERTEXT_SIZE,
                actual: ciphertext.len(),
            }
        })?;
        let sk = mlkem512::SecretKey::from_bytes(secret_key).map_err(|_| {
            KemError::InvalidSecretKey {
                expected: SECRET_KEY_SIZE,
                actual: secret_key.len(),
            }
        })?;

        let ss = mlkem512::decapsulate(&ct, &sk);
        let mut secret = [0u8; SHARED_SECRET_SIZE];
        secret.copy_from_slice(ss.as_bytes());

        Ok(secret.into())
    }
}
