//! Shared fixtures for integration tests

#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chatapp_rs_client::{ChatClient, ClientConfig, ExpiredTokenPolicy, MemoryKeyStore, UserProfile};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Unsigned JWT-shaped token expiring at `exp`
pub fn token_expiring_at(exp: i64, subject: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "id": subject, "exp": exp }).to_string());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

pub fn user(id: &str, name: &str) -> UserProfile {
    let mut user = UserProfile::new(id);
    user.name = Some(name.to_string());
    user.username = Some(name.to_lowercase().replace(' ', "_"));
    user
}

pub fn client(url: String, policy: ExpiredTokenPolicy) -> ChatClient {
    let config = ClientConfig::new(url).with_policy(policy);
    ChatClient::new(config, Arc::new(MemoryKeyStore::new())).expect("client")
}

/// Body of a successful identity response
pub fn auth_body(user_id: &str, access_token: &str) -> String {
    json!({
        "status": true,
        "message": "Success",
        "result": {
            "user": { "_id": user_id, "name": "Jane Doe", "username": "jane_doe" },
            "accessToken": access_token
        }
    })
    .to_string()
}

pub fn ok_body(result: Value) -> String {
    json!({ "status": true, "message": "Success", "result": result }).to_string()
}
