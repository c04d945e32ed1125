use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::kem::KemError;

use crate::exchange::ExchangeError;
use crate::http::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecapsulateRequest {
    /// Ciphertext received from the encapsulating party (base64 encoded)
    pub ciphertext: String,
    /// Secret key of the keypair the ciphertext was made against (base64 encoded)
    pub secret_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecapsulateResponse {
    /// Recovered shared secret (base64 encoded)
    pub secret: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<DecapsulateRequest>,
) -> Result<impl IntoResponse, DecapsulateError> {
    tracing::info!("received decapsulation request");

    let secret = state
        .exchange()
        .decapsulate(&req.ciphertext, &req.secret_key)?;

    tracing::info!("shared secret decapsulated and returned to caller");
    Ok((
        http::StatusCode::OK,
        Json(DecapsulateResponse { secret }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum DecapsulateError {
    #[error("key exchange error: {0}")]
    Exchange(#[from] ExchangeError),
}

impl IntoResponse for DecapsulateError {
    fn into_response(self) -> Response {
        let DecapsulateError::Exchange(err) = self;
        let status = match err {
            ExchangeError::Kem(KemError::Unavailable) => http::StatusCode::SERVICE_UNAVAILABLE,
            _ => http::StatusCode::BAD_REQUEST,
        };
        (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for DecapsulateRequest {
    type Response = DecapsulateResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/decapsulate").unwrap();
        client.post(full_url).json(&self)
    }
}
