//! Persisted `{user, accessToken}` credential record

use crate::error::Result;
use crate::key_store::KeyValueStore;
use crate::types::{AuthResult, UserProfile};
use std::sync::Arc;
use tracing::{debug, warn};

const USER_KEY: &str = "user";
const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Credential store over a secured key-value backend
///
/// The user profile is stored as JSON under `user`, the raw access token
/// under `accessToken`. The two keys are written independently; last writer
/// wins.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Persist the user profile and, if given and non-empty, the access token.
    ///
    /// Saving without a token leaves any previously stored token in place.
    pub async fn save(&self, user: &UserProfile, access_token: Option<&str>) -> Result<()> {
        let serialized = serde_json::to_string(user)?;
        self.backend.set_item(USER_KEY, &serialized).await?;

        if let Some(token) = access_token.filter(|t| !t.is_empty()) {
            self.backend.set_item(ACCESS_TOKEN_KEY, token).await?;
        }

        debug!(user_id = %user.id, token_updated = access_token.is_some_and(|t| !t.is_empty()), "Saved credentials");
        Ok(())
    }

    /// Load the cached user profile.
    ///
    /// Corrupt data is reported as "no user" rather than an error.
    pub async fn load(&self) -> Result<Option<UserProfile>> {
        let Some(raw) = self.backend.get_item(USER_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "Stored user profile is unreadable, ignoring");
                Ok(None)
            }
        }
    }

    /// Load the raw access token
    pub async fn load_token(&self) -> Result<Option<String>> {
        Ok(self.backend.get_item(ACCESS_TOKEN_KEY).await?)
    }

    /// Remove both entries; safe to call when nothing is stored
    pub async fn clear(&self) -> Result<()> {
        self.backend.delete_item(USER_KEY).await?;
        self.backend.delete_item(ACCESS_TOKEN_KEY).await?;
        debug!("Cleared credentials");
        Ok(())
    }

    /// Apply an identity result returned by the backend to the local session
    pub async fn apply_session(&self, result: &AuthResult) -> Result<()> {
        self.save(&result.user, result.access_token.as_deref()).await
    }
}
