use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::kem::KemError;

use crate::exchange::ExchangeError;
use crate::http::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncapsulateRequest {
    /// Recipient public key (base64 encoded)
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncapsulateResponse {
    /// Shared secret for the encapsulating party (base64 encoded)
    pub secret: String,
    /// Ciphertext to send to the key owner (base64 encoded)
    pub ciphertext: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<EncapsulateRequest>,
) -> Result<impl IntoResponse, EncapsulateError> {
    tracing::info!("received encapsulation request");

    let encapsulation = state.exchange().encapsulate(&req.public_key)?;

    tracing::info!("shared secret encapsulated and returned to caller");
    Ok((
        http::StatusCode::OK,
        Json(EncapsulateResponse {
            secret: encapsulation.secret,
            ciphertext: encapsulation.ciphertext,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum EncapsulateError {
    #[error("key exchange error: {0}")]
    Exchange(#[from] ExchangeError),
}

impl IntoResponse for EncapsulateError {
    fn into_response(self) -> Response {
        let EncapsulateError::Exchange(err) = self;
        let status = match err {
            ExchangeError::Kem(KemError::Unavailable) => http::StatusCode::SERVICE_UNAVAILABLE,
            _ => http::StatusCode::BAD_REQUEST,
        };
        (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for EncapsulateRequest {
    type Response = EncapsulateResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/encapsulate").unwrap();
        client.post(full_url).json(&self)
    }
}
