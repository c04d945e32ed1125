//! Key exchange orchestration over the KEM provider
//!
//! All caller-facing payloads are standard-alphabet base64 with padding;
//! decoding happens here, never inside the provider, so the provider
//! contract stays in pure-binary terms. Every operation is a fresh,
//! idempotent-on-failure attempt: nothing is cached, retried, or shared
//! between calls beyond the immutable backend selection.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use common::prelude::{Backend, KemError, KemProvider, Provider};

/// A generated keypair, both halves base64 encoded
#[derive(Debug, Clone)]
pub struct EncodedKeyPair {
    pub public_key: String,
    pub secret_key: String,
}

/// An encapsulation result, both fields base64 encoded
#[derive(Debug, Clone)]
pub struct EncodedEncapsulation {
    pub secret: String,
    pub ciphertext: String,
}

/// Errors surfaced by the key exchange operations
///
/// All are terminal for the call; none are retried internally or downgraded
/// to a default value.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("invalid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error(transparent)]
    Kem(#[from] KemError),
}

/// Stateless orchestration over the three protocol operations
///
/// Holds only the backend selection made at startup; each call constructs a
/// transient provider from it, so independent requests run fully in
/// parallel with no locking.
#[derive(Debug, Clone)]
pub struct KeyExchange {
    backend: Backend,
}

impl KeyExchange {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    fn provider(&self) -> Provider {
        self.backend.provider()
    }

    /// Generate a fresh keypair and hand both halves to the caller.
    ///
    /// No association between the halves is retained; the caller owns them.
    pub fn generate_keypair(&self) -> Result<EncodedKeyPair, ExchangeError> {
        let keypair = self.provider().generate_keypair()?;
        tracing::debug!("keypair generated");
        Ok(EncodedKeyPair {
            public_key: encode(keypair.public_key.bytes()),
            secret_key: encode(keypair.secret_key.bytes()),
        })
    }

    /// Encapsulate a shared secret against a base64 public key.
    pub fn encapsulate(&self, public_key_b64: &str) -> Result<EncodedEncapsulation, ExchangeError> {
        let public_key = decode(public_key_b64)?;
        let encapsulation = self.provider().encapsulate(&public_key)?;
        tracing::debug!("shared secret encapsulated");
        Ok(EncodedEncapsulation {
            secret: encode(encapsulation.shared_secret.bytes()),
            ciphertext: encode(encapsulation.ciphertext.bytes()),
        })
    }

    /// Recover the base64 shared secret from a base64 ciphertext and
    /// secret key.
    pub fn decapsulate(
        &self,
        ciphertext_b64: &str,
        secret_key_b64: &str,
    ) -> Result<String, ExchangeError> {
        let ciphertext = decode(ciphertext_b64)?;
        let secret_key = decode(secret_key_b64)?;
        let secret = self.provider().decapsulate(&ciphertext, &secret_key)?;
        tracing::debug!("shared secret decapsulated");
        Ok(encode(secret.bytes()))
    }
}

fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

fn decode(text: &str) -> Result<Vec<u8>, ExchangeError> {
    Ok(STANDARD.decode(text)?)
}
