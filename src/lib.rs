//! Chat Rust Client
//!
//! A Rust client library for the chat backend, with persisted credentials,
//! bearer-token expiry detection, and single-flight access-token refresh.

pub mod api;
pub mod auth_client;
pub mod client;
pub mod config;
pub mod credential_store;
pub mod error;
pub mod http;
pub mod key_store;
pub mod token;
pub mod types;

pub use api::image_mime_type;
pub use auth_client::AuthClient;
pub use client::ChatClient;
pub use config::{ClientConfig, ExpiredTokenPolicy};
pub use credential_store::CredentialStore;
pub use error::{ClientError, Result};
pub use key_store::{FileKeyStore, KeyValueStore, MemoryKeyStore};
pub use types::{AuthResult, Chat, Envelope, PhotoKind, SearchResult, UserProfile, UserResult};
