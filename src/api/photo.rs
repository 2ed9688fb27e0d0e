//! Profile and cover photo endpoints

use super::user_path;
use crate::client::ChatClient;
use crate::error::Result;
use crate::types::{AuthResult, Envelope, PhotoKind};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadPhotoRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_photo: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cover_photo: Option<&'a str>,
}

/// Mime type for an image file name or URL.
///
/// Query strings are ignored, `jpg` maps to `image/jpeg`, anything else to
/// `image/<ext>`. Without a name the answer is `image/jpeg`.
pub fn image_mime_type(file_name: Option<&str>) -> String {
    let Some(name) = file_name.filter(|n| !n.is_empty()) else {
        return "image/jpeg".to_string();
    };

    let without_query = name.split('?').next().unwrap_or(name);
    let extension = without_query
        .rsplit('.')
        .next()
        .unwrap_or(without_query)
        .to_ascii_lowercase();

    if extension == "jpg" {
        "image/jpeg".to_string()
    } else {
        format!("image/{extension}")
    }
}

impl ChatClient {
    /// Set profile and/or cover photo from already-hosted image URLs
    pub async fn upload_photo(
        &self,
        profile_photo: Option<&str>,
        cover_photo: Option<&str>,
    ) -> Result<Envelope<AuthResult>> {
        let request = self
            .http
            .request(Method::PATCH, &user_path("upload-photo"))
            .json(&UploadPhotoRequest {
                profile_photo,
                cover_photo,
            });
        self.send_authorized(request).await
    }

    /// Upload local image files as multipart parts `profilePhoto` / `coverPhoto`
    pub async fn upload_photo_files(
        &self,
        profile_photo: Option<&Path>,
        cover_photo: Option<&Path>,
    ) -> Result<Envelope<AuthResult>> {
        let mut form = Form::new();
        for (kind, path) in [
            (PhotoKind::Profile, profile_photo),
            (PhotoKind::Cover, cover_photo),
        ] {
            if let Some(path) = path {
                form = form.part(kind.field(), photo_part(kind, path).await?);
            }
        }

        let request = self
            .http
            .request(Method::PATCH, &user_path("upload-photo"))
            .multipart(form);
        self.send_authorized(request).await
    }

    /// Remove one of the user's photos
    pub async fn delete_photo(&self, photo: &str, kind: PhotoKind) -> Result<Envelope<AuthResult>> {
        let mut body = serde_json::Map::new();
        body.insert(kind.field().to_string(), photo.into());

        let request = self
            .http
            .request(Method::PATCH, &user_path("delete-photo"))
            .json(&body);
        self.send_authorized(request).await
    }
}

async fn photo_part(kind: PhotoKind, path: &Path) -> Result<Part> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .unwrap_or("jpg")
        .to_ascii_lowercase();
    let file_name = format!("{}.{extension}", kind.file_stem());
    let mime = image_mime_type(Some(&file_name));

    let bytes = tokio::fs::read(path).await?;
    debug!(field = kind.field(), file_name = %file_name, size = bytes.len(), "Attaching photo");

    Ok(Part::bytes(bytes).file_name(file_name).mime_str(&mime)?)
}
