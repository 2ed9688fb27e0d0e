//! Typed wrappers over the backend REST endpoints
//!
//! Wrappers only call the endpoint and return the envelope. Identity results
//! are applied to local storage by the caller through
//! [`ChatClient::apply_session`](crate::ChatClient::apply_session) or
//! [`ChatClient::apply_profile`](crate::ChatClient::apply_profile).

pub mod chat;
pub mod photo;
pub mod user;

pub use photo::image_mime_type;

pub(crate) const USER_API: &str = "/api/user";
pub(crate) const CHAT_API: &str = "/api/chat";

pub(crate) fn user_path(endpoint: &str) -> String {
    format!("{USER_API}/{endpoint}")
}

pub(crate) fn chat_path(endpoint: &str) -> String {
    format!("{CHAT_API}/{endpoint}")
}
