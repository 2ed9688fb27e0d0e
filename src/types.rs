//! Wire types shared by the backend endpoints

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Uniform response wrapper returned by every backend endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    /// Turn a `status: false` envelope into a `ClientError::Server`
    pub fn ensure_ok(self) -> Result<Self> {
        if self.status {
            Ok(self)
        } else {
            Err(ClientError::Server {
                status: None,
                message: self.message,
            })
        }
    }

    /// Unwrap the `result` payload of a successful envelope
    pub fn into_result(self) -> Result<T> {
        let envelope = self.ensure_ok()?;
        envelope
            .result
            .ok_or_else(|| ClientError::InvalidResponse("envelope has no result".to_string()))
    }
}

/// Cached user profile.
///
/// Fields the client does not model are kept in `extra` so a stored profile
/// round-trips exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            username: None,
            email: None,
            profile_photo: None,
            cover_photo: None,
            bio: None,
            followers: None,
            following: None,
            extra: Map::new(),
        }
    }
}

/// `result` of identity-mutating endpoints (login, verify, reset, refresh, photos)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub user: UserProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// `result` of profile updates that return only the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResult {
    pub user: UserProfile,
}

/// `result` of the user search endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub users: Vec<UserProfile>,
}

/// Direct or group conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_group_chat: bool,
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub latest_message: Option<String>,
    #[serde(default)]
    pub group_admins: Vec<UserProfile>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Which of the two profile images an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoKind {
    Profile,
    Cover,
}

impl PhotoKind {
    /// Field name the backend uses for this image
    pub fn field(self) -> &'static str {
        match self {
            PhotoKind::Profile => "profilePhoto",
            PhotoKind::Cover => "coverPhoto",
        }
    }

    /// Base file name used for multipart uploads
    pub fn file_stem(self) -> &'static str {
        match self {
            PhotoKind::Profile => "profile",
            PhotoKind::Cover => "cover",
        }
    }
}
