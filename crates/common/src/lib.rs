/**
 * Key encapsulation capability.
 *  - Binary-domain key, ciphertext and shared secret types
 *  - Real ML-KEM-512 provider and the shape-only fallback
 *  - One-shot backend selection made at process startup
 */
pub mod kem;

pub mod prelude {
    pub use crate::kem::{
        Backend, Encapsulation, KemError, KemProvider, KeyPair, Provider, CIPHERTEXT_SIZE,
        PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, SHARED_SECRET_SIZE,
    };
}
