//! End-to-end tests for the key exchange HTTP API
//!
//! Each test serves the real router on an ephemeral port and drives it
//! through the typed API client, the same way an external caller would.

use std::net::SocketAddr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use url::Url;

use common::kem::SHARED_SECRET_SIZE;
use service::http::api::client::{ApiClient, ApiError};
use service::http::api::{DecapsulateRequest, EncapsulateRequest, GenerateRequest};
use service::{Config, ServiceState};

async fn spawn_server() -> (ApiClient, SocketAddr) {
    let config = Config {
        allow_insecure_fallback: true,
        ..Config::default()
    };
    let state = ServiceState::from_config(&config).unwrap();
    let router = service::http::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let url = Url::parse(&format!("http://{}", addr)).unwrap();
    (ApiClient::new(&url).unwrap(), addr)
}

#[tokio::test]
async fn test_full_key_exchange_scenario() {
    let (client, _) = spawn_server().await;

    let keypair = client.call(GenerateRequest::default()).await.unwrap();
    assert!(!keypair.public_key.is_empty());
    assert!(!keypair.secret_key.is_empty());

    let encapsulation = client
        .call(EncapsulateRequest {
            public_key: keypair.public_key.clone(),
        })
        .await
        .unwrap();

    let decapsulation = client
        .call(DecapsulateRequest {
            ciphertext: encapsulation.ciphertext.clone(),
            secret_key: keypair.secret_key.clone(),
        })
        .await
        .unwrap();

    assert_eq!(decapsulation.secret, encapsulation.secret);
    let secret_bytes = STANDARD.decode(&decapsulation.secret).unwrap();
    assert_eq!(secret_bytes.len(), SHARED_SECRET_SIZE);
}

#[tokio::test]
async fn test_generate_is_not_deterministic() {
    let (client, _) = spawn_server().await;

    let first = client.call(GenerateRequest::default()).await.unwrap();
    let second = client.call(GenerateRequest::default()).await.unwrap();
    assert_ne!(first.public_key, second.public_key);
    assert_ne!(first.secret_key, second.secret_key);
}

#[tokio::test]
async fn test_encapsulate_rejects_malformed_base64() {
    let (client, _) = spawn_server().await;

    let result = client
        .call(EncapsulateRequest {
            public_key: "not!!valid@@base64".to_string(),
        })
        .await;

    match result {
        Err(ApiError::HttpStatus(status, body)) => {
            assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
            assert!(body.contains("invalid base64"), "unexpected body: {}", body);
        }
        other => panic!("expected HTTP 400, got {:?}", other.map(|r| r.secret)),
    }
}

#[tokio::test]
async fn test_encapsulate_rejects_wrong_length_public_key() {
    let (client, _) = spawn_server().await;

    let result = client
        .call(EncapsulateRequest {
            public_key: STANDARD.encode([0u8; 12]),
        })
        .await;

    match result {
        Err(ApiError::HttpStatus(status, body)) => {
            assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
            assert!(
                body.contains("invalid public key"),
                "unexpected body: {}",
                body
            );
        }
        other => panic!("expected HTTP 400, got {:?}", other.map(|r| r.secret)),
    }
}

#[tokio::test]
async fn test_decapsulate_rejects_wrong_length_ciphertext() {
    let (client, _) = spawn_server().await;

    let keypair = client.call(GenerateRequest::default()).await.unwrap();
    let result = client
        .call(DecapsulateRequest {
            ciphertext: STANDARD.encode([0u8; 5]),
            secret_key: keypair.secret_key,
        })
        .await;

    match result {
        Err(ApiError::HttpStatus(status, body)) => {
            assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
            assert!(
                body.contains("invalid ciphertext"),
                "unexpected body: {}",
                body
            );
        }
        other => panic!("expected HTTP 400, got {:?}", other.map(|r| r.secret)),
    }
}

#[tokio::test]
#[cfg(feature = "ml-kem")]
async fn test_cross_pair_decapsulation_yields_different_secret() {
    let (client, _) = spawn_server().await;

    let alice = client.call(GenerateRequest::default()).await.unwrap();
    let bob = client.call(GenerateRequest::default()).await.unwrap();

    let encapsulation = client
        .call(EncapsulateRequest {
            public_key: bob.public_key,
        })
        .await
        .unwrap();

    // ML-KEM implicit rejection: the call succeeds but the recovered
    // secret does not match the encapsulated one.
    let mismatched = client
        .call(DecapsulateRequest {
            ciphertext: encapsulation.ciphertext,
            secret_key: alice.secret_key,
        })
        .await
        .unwrap();

    assert_ne!(mismatched.secret, encapsulation.secret);
}

#[tokio::test]
async fn test_status_routes() {
    let (_, addr) = spawn_server().await;

    let health: serde_json::Value =
        reqwest::get(format!("http://{}/_status/healthz", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    assert_eq!(health["status"], "ok");

    let provider: serde_json::Value =
        reqwest::get(format!("http://{}/_status/provider", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    if cfg!(feature = "ml-kem") {
        assert_eq!(provider["provider"], "ml-kem-512");
        assert_eq!(provider["secure"], true);
    } else {
        assert_eq!(provider["provider"], "fallback");
        assert_eq!(provider["secure"], false);
    }

    let version = reqwest::get(format!("http://{}/_status/version", addr))
        .await
        .unwrap();
    assert_eq!(version.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_returns_not_found() {
    let (_client, addr) = spawn_server().await;

    let response = reqwest::get(format!("http://{}/definitely-not-a-route", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
