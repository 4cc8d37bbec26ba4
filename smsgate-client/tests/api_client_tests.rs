#![cfg(feature = "aes-cbc")]

use pretty_assertions::assert_eq;
use smsgate_client::{AsyncApiClient, ClientConfig, ClientError, Message, ProcessState};
use smsgate_crypto::{AesEncryptor, Encryptor};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ClientConfig {
    init_tracing();
    ClientConfig::new("user", "pass").with_base_url(server.uri())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn encryptor() -> Arc<AesEncryptor> {
    Arc::new(AesEncryptor::with_iterations("passphrase", 1000).unwrap())
}

fn state_json(phone: &str, encrypted: bool) -> serde_json::Value {
    serde_json::json!({
        "id": "msg-1",
        "state": "Pending",
        "recipients": [{ "phoneNumber": phone, "state": "Pending" }],
        "isHashed": false,
        "isEncrypted": encrypted
    })
}

// --- Plain ---

#[tokio::test]
async fn send_posts_camel_case_payload_with_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/message"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(202).set_body_json(state_json("+15550001111", false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = AsyncApiClient::new(config(&server), None).unwrap();
    let state = client
        .send(Message::new("hi", ["+15550001111"]).with_sim_number(2))
        .await
        .unwrap();

    assert_eq!(state.id, "msg-1");
    assert_eq!(state.state, ProcessState::Pending);
    assert_eq!(state.recipients[0].phone_number, "+15550001111");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "message": "hi",
            "phoneNumbers": ["+15550001111"],
            "withDeliveryReport": true,
            "isEncrypted": false,
            "simNumber": 2
        })
    );
}

#[tokio::test]
async fn get_state_hits_message_id_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/message/msg-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_json("+1", false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = AsyncApiClient::new(config(&server), None).unwrap();
    let state = client.get_state("msg-1").await.unwrap();
    assert_eq!(state.recipients[0].phone_number, "+1");
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/message/x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_json("+1", false)))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = ClientConfig::new("user", "pass").with_base_url(format!("{}/", server.uri()));
    let client = AsyncApiClient::new(cfg, None).unwrap();
    assert!(client.get_state("x").await.is_ok());
}

// --- Errors ---

#[tokio::test]
async fn non_success_status_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/message"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let client = AsyncApiClient::new(config(&server), None).unwrap();
    let err = client.send(Message::new("hi", ["+1"])).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 401, ref body } if body == "unauthorized"));
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn malformed_state_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/message/m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "m" })))
        .mount(&server)
        .await;

    let client = AsyncApiClient::new(config(&server), None).unwrap();
    assert!(matches!(
        client.get_state("m").await,
        Err(ClientError::Serialization(_))
    ));
}

#[tokio::test]
async fn encrypted_state_without_encryptor_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/message/msg-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_json("$aes...", true)))
        .mount(&server)
        .await;

    let client = AsyncApiClient::new(config(&server), None).unwrap();
    assert!(matches!(
        client.get_state("msg-1").await,
        Err(ClientError::MissingEncryptor)
    ));
}

#[tokio::test]
async fn already_encrypted_message_is_never_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202).set_body_json(state_json("+1", false)))
        .expect(0)
        .mount(&server)
        .await;

    let client = AsyncApiClient::new(config(&server), Some(encryptor())).unwrap();
    let msg = Message::new("hi", ["+1"]).with_encrypted(true);
    assert!(matches!(
        client.send(msg).await,
        Err(ClientError::AlreadyEncrypted)
    ));
}

// --- Encrypted ---

#[tokio::test]
async fn send_encrypts_body_and_phones_before_posting() {
    let server = MockServer::start().await;
    let enc = encryptor();
    let phone_envelope = enc.encrypt("+15550001111").unwrap();

    Mock::given(method("POST"))
        .and(path("/message"))
        .respond_with(ResponseTemplate::new(202).set_body_json(state_json(&phone_envelope, true)))
        .expect(1)
        .mount(&server)
        .await;

    let client = AsyncApiClient::new(config(&server), Some(enc.clone())).unwrap();
    let state = client
        .send(Message::new("secret body", ["+15550001111"]))
        .await
        .unwrap();

    // Response decrypted back to cleartext.
    assert!(!state.is_encrypted);
    assert_eq!(state.recipients[0].phone_number, "+15550001111");

    // Request went out encrypted.
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["isEncrypted"], true);

    let sent_body = body["message"].as_str().unwrap();
    assert!(sent_body.starts_with("$aes-256-cbc/pbkdf2-sha1$i=1000$"));
    assert_eq!(enc.decrypt(sent_body).unwrap(), "secret body");

    let sent_phone = body["phoneNumbers"][0].as_str().unwrap();
    assert_ne!(sent_phone, "+15550001111");
    assert_eq!(enc.decrypt(sent_phone).unwrap(), "+15550001111");
}

#[tokio::test]
async fn get_state_decrypts_known_envelope() {
    let server = MockServer::start().await;
    let envelope =
        "$aes-256-cbc/pbkdf2-sha1$i=75000$obSTW6ittQvTtdAxonQKIw==$g3QFAC9CtBcPxoKlouqsyQ==";
    Mock::given(method("GET"))
        .and(path("/message/msg-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_json(envelope, true)))
        .mount(&server)
        .await;

    let client =
        AsyncApiClient::new(config(&server), Some(Arc::new(AesEncryptor::new("passphrase"))))
            .unwrap();
    let state = client.get_state("msg-1").await.unwrap();
    assert_eq!(state.recipients[0].phone_number, "hello");
    assert!(!state.is_encrypted);
}

#[tokio::test]
async fn plain_state_passes_through_with_encryptor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/message/msg-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_json("+1", false)))
        .mount(&server)
        .await;

    let client = AsyncApiClient::new(config(&server), Some(encryptor())).unwrap();
    let state = client.get_state("msg-1").await.unwrap();
    assert_eq!(state.recipients[0].phone_number, "+1");
}

#[tokio::test]
async fn wrong_passphrase_surfaces_crypto_error() {
    let server = MockServer::start().await;
    let envelope = encryptor().encrypt("+15550001111").unwrap();
    Mock::given(method("GET"))
        .and(path("/message/msg-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_json(&envelope, true)))
        .mount(&server)
        .await;

    let other = Arc::new(AesEncryptor::with_iterations("other", 1000).unwrap());
    let client = AsyncApiClient::new(config(&server), Some(other)).unwrap();
    match client.get_state("msg-1").await {
        Err(ClientError::Crypto(_)) => {}
        Ok(state) => assert_ne!(state.recipients[0].phone_number, "+15550001111"),
        Err(e) => panic!("unexpected error: {e}"),
    }
}
