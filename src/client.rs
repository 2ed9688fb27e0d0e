//! Chat backend client: wires the HTTP core, credential store and token lifecycle

use crate::auth_client::AuthClient;
use crate::config::ClientConfig;
use crate::credential_store::CredentialStore;
use crate::error::Result;
use crate::http::HttpCore;
use crate::key_store::KeyValueStore;
use crate::types::{AuthResult, Envelope, UserProfile};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::info;

/// Client for the chat backend
///
/// Construct one per session and share it by reference; there is no global
/// instance. Endpoint wrappers live in [`crate::api`].
pub struct ChatClient {
    pub(crate) http: Arc<HttpCore>,
    credentials: CredentialStore,
    auth: AuthClient,
}

impl ChatClient {
    /// Create a client persisting credentials into `backend`
    pub fn new(config: ClientConfig, backend: Arc<dyn KeyValueStore>) -> Result<Self> {
        let http = Arc::new(HttpCore::new(&config)?);
        let credentials = CredentialStore::new(backend);
        let auth = AuthClient::new(Arc::clone(&http), credentials.clone(), &config);

        Ok(Self {
            http,
            credentials,
            auth,
        })
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Cached profile of the signed-in user, if any
    pub async fn current_user(&self) -> Result<Option<UserProfile>> {
        self.credentials.load().await
    }

    /// Store the user and token from an identity envelope.
    ///
    /// Envelopes with `status: false` or no result leave storage untouched and
    /// return `Ok(false)`.
    pub async fn apply_session(&self, envelope: &Envelope<AuthResult>) -> Result<bool> {
        match (&envelope.result, envelope.status) {
            (Some(result), true) => {
                self.credentials.apply_session(result).await?;
                info!(user_id = %result.user.id, "Session updated");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Forget the stored user and token
    pub async fn logout(&self) -> Result<()> {
        self.credentials.clear().await?;
        info!("Logged out");
        Ok(())
    }

    /// Send a request that needs no token
    pub(crate) async fn send_public<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>> {
        self.http.send(request).await
    }

    /// Send a request with the bearer token chosen by the token lifecycle
    pub(crate) async fn send_authorized<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>> {
        let request = match self.auth.authorization().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        self.http.send(request).await
    }
}
