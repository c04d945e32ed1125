use axum::routing::post;
use axum::Router;
use http::header::{ACCEPT, CONTENT_TYPE, ORIGIN};
use http::Method;
use tower_http::cors::{Any, CorsLayer};

pub mod client;
pub mod decapsulate;
pub mod encapsulate;
pub mod generate;

// Re-export for convenience
pub use decapsulate::DecapsulateRequest;
pub use encapsulate::EncapsulateRequest;
pub use generate::GenerateRequest;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST])
        .allow_headers(vec![ACCEPT, CONTENT_TYPE, ORIGIN])
        .allow_origin(Any)
        .allow_credentials(false);

    Router::new()
        .route("/generate", post(generate::handler))
        .route("/encapsulate", post(encapsulate::handler))
        .route("/decapsulate", post(decapsulate::handler))
        .with_state(state)
        .layer(cors_layer)
}
