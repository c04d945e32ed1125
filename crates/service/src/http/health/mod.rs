//! Health and observability routes
//!
//! `/_status/provider` is the runtime surface through which a deployment's
//! provider choice stays visible: the insecure fallback must never be
//! active without this endpoint saying so.

use axum::routing::get;
use axum::Router;

pub mod healthz;
pub mod provider;
pub mod version;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/healthz", get(healthz::handler))
        .route("/version", get(version::handler))
        .route("/provider", get(provider::handler))
        .with_state(state)
}
