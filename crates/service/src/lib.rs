//! Shared service infrastructure for the kex server.
//!
//! This crate provides everything between the KEM provider and the wire:
//! - Key exchange orchestration (the base64 text boundary over the
//!   binary-only provider contract)
//! - State management (the one-shot provider selection, made at startup)
//! - HTTP routers and handlers (the three protocol endpoints plus health
//!   checks) and a typed API client for them

pub mod config;
pub mod exchange;
pub mod http;
pub mod state;

// Re-export key types for convenience
pub use config::Config;
pub use exchange::{ExchangeError, KeyExchange};
pub use state::{State as ServiceState, StateSetupError};
