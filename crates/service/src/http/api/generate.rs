use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::kem::KemError;

use crate::exchange::ExchangeError;
use crate::http::api::client::ApiRequest;
use crate::ServiceState;

/// Request a fresh keypair. The operation takes no input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Public key (base64 encoded)
    pub public_key: String,
    /// Secret key (base64 encoded)
    pub secret_key: String,
}

pub async fn handler(State(state): State<ServiceState>) -> Result<impl IntoResponse, GenerateError> {
    tracing::info!("received keypair generation request");

    let keypair = state.exchange().generate_keypair()?;

    tracing::info!("keypair generated and returned to caller");
    Ok((
        http::StatusCode::OK,
        Json(GenerateResponse {
            public_key: keypair.public_key,
            secret_key: keypair.secret_key,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("key exchange error: {0}")]
    Exchange(#[from] ExchangeError),
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let GenerateError::Exchange(err) = self;
        let status = match err {
            ExchangeError::Kem(KemError::Unavailable) => http::StatusCode::SERVICE_UNAVAILABLE,
            _ => http::StatusCode::BAD_REQUEST,
        };
        (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for GenerateRequest {
    type Response = GenerateResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/generate").unwrap();
        client.post(full_url).json(&self)
    }
}
