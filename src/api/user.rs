//! Account endpoints under `/api/user`

use super::user_path;
use crate::client::ChatClient;
use crate::error::{ClientError, Result};
use crate::types::{AuthResult, Envelope, SearchResult, UserResult};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct EmailCodeRequest<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest<'a> {
    email: &'a str,
    new_password: &'a str,
}

#[derive(Serialize, Default)]
struct ChangeNamesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

/// `new` if it is set and differs from `old`
fn changed(new: Option<&str>, old: Option<&str>) -> Option<String> {
    new.filter(|v| !v.is_empty() && Some(*v) != old)
        .map(str::to_string)
}

impl ChatClient {
    /// Whether an account exists for `email`
    pub async fn exist_email(&self, email: &str) -> Result<Envelope<Value>> {
        let request = self
            .http
            .request(Method::GET, &user_path("exist-email"))
            .query(&[("email", email)]);
        self.send_public(request).await
    }

    /// Whether `username` is taken
    pub async fn exist_username(&self, username: &str) -> Result<Envelope<Value>> {
        let request = self
            .http
            .request(Method::GET, &user_path("exist-username"))
            .query(&[("username", username)]);
        self.send_public(request).await
    }

    /// Start registration; the backend mails a verification code
    pub async fn register(
        &self,
        name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Envelope<Value>> {
        let request = self
            .http
            .request(Method::POST, &user_path("register"))
            .json(&RegisterRequest {
                name,
                username,
                email,
                password,
            });
        self.send_public(request).await
    }

    /// Finish registration with the mailed code
    pub async fn register_verify(&self, email: &str, code: &str) -> Result<Envelope<AuthResult>> {
        let request = self
            .http
            .request(Method::POST, &user_path("register-verify"))
            .json(&EmailCodeRequest { email, code });
        self.send_public(request).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Envelope<Value>> {
        let request = self
            .http
            .request(Method::POST, &user_path("forgot-password"))
            .json(&EmailRequest { email });
        self.send_public(request).await
    }

    pub async fn forgot_password_verify(&self, email: &str, code: &str) -> Result<Envelope<Value>> {
        let request = self
            .http
            .request(Method::POST, &user_path("forgot-password-verify"))
            .json(&EmailCodeRequest { email, code });
        self.send_public(request).await
    }

    /// Set a new password after `forgot_password_verify`; signs the user in
    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<Envelope<AuthResult>> {
        let request = self
            .http
            .request(Method::PATCH, &user_path("reset-password"))
            .json(&ResetPasswordRequest {
                email,
                new_password,
            });
        self.send_public(request).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Envelope<AuthResult>> {
        let request = self
            .http
            .request(Method::POST, &user_path("login"))
            .json(&LoginRequest { email, password });
        self.send_public(request).await
    }

    /// Raw refresh call; nothing is stored
    pub async fn refresh(&self) -> Result<Envelope<AuthResult>> {
        self.auth().request_refresh().await
    }

    /// Refresh now and store the new token, sharing any refresh already in flight
    pub async fn refresh_token(&self) -> Result<String> {
        self.auth().refresh_token().await
    }

    /// Rename the signed-in user.
    ///
    /// Only values that differ from the cached profile are sent. When nothing
    /// differs, returns `ClientError::NothingToUpdate` without calling the
    /// backend.
    pub async fn change_names(
        &self,
        name: Option<&str>,
        username: Option<&str>,
    ) -> Result<Envelope<UserResult>> {
        let cached = self.current_user().await?;
        let payload = ChangeNamesRequest {
            name: changed(name, cached.as_ref().and_then(|u| u.name.as_deref())),
            username: changed(username, cached.as_ref().and_then(|u| u.username.as_deref())),
        };

        if payload.name.is_none() && payload.username.is_none() {
            return Err(ClientError::NothingToUpdate);
        }

        let request = self
            .http
            .request(Method::PATCH, &user_path("change-names"))
            .json(&payload);
        self.send_authorized(request).await
    }

    /// Store the updated profile from `change_names`, keeping the current token
    pub async fn apply_profile(&self, envelope: &Envelope<UserResult>) -> Result<bool> {
        match (&envelope.result, envelope.status) {
            (Some(result), true) => {
                self.credentials().save(&result.user, None).await?;
                info!(user_id = %result.user.id, "Profile updated");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Find users by name or username
    pub async fn search_user(&self, keyword: &str) -> Result<Envelope<SearchResult>> {
        let request = self
            .http
            .request(Method::GET, &user_path("search"))
            .query(&[("keyword", keyword)]);
        self.send_authorized(request).await
    }
}
