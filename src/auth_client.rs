//! Access token lifecycle: attach, detect expiry, refresh with single-flight

use crate::config::{ClientConfig, ExpiredTokenPolicy};
use crate::credential_store::CredentialStore;
use crate::error::{ClientError, Result, SharedError};
use crate::http::HttpCore;
use crate::token;
use crate::types::{AuthResult, Envelope};
use async_singleflight::Group;
use parking_lot::Mutex;
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const REFRESH_PATH: &str = "/api/user/refresh";

/// Every refresh shares one flight; there is only one session per client
const REFRESH_FLIGHT_KEY: &str = "access-token-refresh";

/// Own flight plus one takeover after an abandoned flight
const REFRESH_ATTEMPTS: usize = 2;

/// Decides which bearer token, if any, goes on an outgoing request
///
/// Concurrent callers that find the stored token expired share a single
/// refresh call instead of each issuing their own.
pub struct AuthClient {
    http: Arc<HttpCore>,
    credentials: CredentialStore,
    policy: ExpiredTokenPolicy,
    refresh_timeout: Duration,
    refresh_singleflight: Group<String, SharedError>,
    /// Failure of the last flight; the group only hands its error to the owner
    refresh_failure: Mutex<Option<SharedError>>,
}

impl AuthClient {
    pub fn new(http: Arc<HttpCore>, credentials: CredentialStore, config: &ClientConfig) -> Self {
        Self {
            http,
            credentials,
            policy: config.expired_token_policy,
            refresh_timeout: config.refresh_timeout(),
            refresh_singleflight: Group::new(),
            refresh_failure: Mutex::new(None),
        }
    }

    pub fn policy(&self) -> ExpiredTokenPolicy {
        self.policy
    }

    /// Token to attach to an authenticated request
    ///
    /// - Valid stored token: returned as is
    /// - Expired or missing token, `Refresh` policy: refreshed first
    /// - Expired or missing token, `Proceed` policy: `None`, the request goes
    ///   out without `Authorization`
    pub async fn authorization(&self) -> Result<Option<String>> {
        if let Some(token) = self.valid_stored_token().await? {
            debug!("Attaching stored access token");
            return Ok(Some(token));
        }

        match self.policy {
            ExpiredTokenPolicy::Proceed => {
                debug!("No valid access token, sending request unauthenticated");
                Ok(None)
            }
            ExpiredTokenPolicy::Refresh => {
                debug!("No valid access token, refreshing before request");
                self.refresh_singleflight(false).await.map(Some)
            }
        }
    }

    /// Refresh the access token now, regardless of the stored token's expiry
    pub async fn refresh_token(&self) -> Result<String> {
        self.refresh_singleflight(true).await
    }

    /// Call the refresh endpoint without touching local state
    pub async fn request_refresh(&self) -> Result<Envelope<AuthResult>> {
        let mut request = self.http.request(Method::POST, REFRESH_PATH);
        // The backend reads its session cookie; the stale token rides along for
        // servers that key refresh on it instead.
        if let Some(stale) = self.credentials.load_token().await? {
            request = request.bearer_auth(stale);
        }
        self.http.send(request).await
    }

    async fn valid_stored_token(&self) -> Result<Option<String>> {
        Ok(self
            .credentials
            .load_token()
            .await?
            .filter(|token| !token::is_expired(token)))
    }

    /// Join the refresh in flight or start one
    ///
    /// Waiters read the owner's failure from `refresh_failure`. If the owner
    /// was dropped mid-flight there is no outcome to share, so a waiter runs
    /// the refresh itself.
    async fn refresh_singleflight(&self, force: bool) -> Result<String> {
        for attempt in 0..REFRESH_ATTEMPTS {
            let (success_opt, error_opt, _shared) = self
                .refresh_singleflight
                .work(REFRESH_FLIGHT_KEY, self.refresh_flight(force))
                .await;

            match (success_opt, error_opt) {
                (Some(token), _) => return Ok(token),
                (None, Some(err)) => return Err(err.into()),
                (None, None) => {
                    let published = self.refresh_failure.lock().clone();
                    if let Some(err) = published {
                        return Err(err.into());
                    }
                    debug!(attempt, "Refresh owner went away, taking over");
                }
            }
        }

        Err(ClientError::Authentication(
            "Unknown error during token refresh".to_string(),
        ))
    }

    async fn refresh_flight(&self, force: bool) -> std::result::Result<String, SharedError> {
        *self.refresh_failure.lock() = None;

        // A flight that completed between our expiry check and joining the
        // group has already stored a fresh token.
        if !force {
            if let Ok(Some(token)) = self.valid_stored_token().await {
                return Ok(token);
            }
        }

        self.do_refresh().await.map_err(|e| {
            warn!(error = %e, "Access token refresh failed");
            let shared = SharedError::from(&e);
            *self.refresh_failure.lock() = Some(shared.clone());
            shared
        })
    }

    /// One bounded refresh round-trip; persists only on full success
    async fn do_refresh(&self) -> Result<String> {
        let envelope = tokio::time::timeout(self.refresh_timeout, self.request_refresh())
            .await
            .map_err(|_| ClientError::RefreshTimeout(self.refresh_timeout))??;

        let result = envelope.into_result()?;
        let token = result
            .access_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ClientError::InvalidResponse("refresh response carries no access token".to_string())
            })?;

        self.credentials.apply_session(&result).await?;
        info!(user_id = %result.user.id, "Access token refreshed");

        Ok(token)
    }
}
