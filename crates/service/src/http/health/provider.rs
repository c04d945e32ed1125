use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Serialize;

use crate::ServiceState;

#[derive(Debug, Serialize)]
pub struct ProviderResponse {
    /// Name of the active KEM provider variant
    pub provider: String,
    /// Whether the variant provides real cryptographic security
    pub secure: bool,
}

#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> Response {
    let backend = state.backend();
    (
        StatusCode::OK,
        Json(ProviderResponse {
            provider: backend.name().to_string(),
            secure: backend.is_secure(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Config;

    #[tokio::test]
    async fn test_handler_direct() {
        let config = Config {
            allow_insecure_fallback: true,
            ..Config::default()
        };
        let state = ServiceState::from_config(&config).unwrap();
        let response = handler(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
