//! Conversation endpoints under `/api/chat`

use super::{chat_path, CHAT_API};
use crate::client::ChatClient;
use crate::error::Result;
use crate::types::{Chat, Envelope};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReceiverRequest<'a> {
    receiver_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatIdRequest<'a> {
    chat_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateGroupRequest<'a> {
    name: &'a str,
    user_ids: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupIdRequest<'a> {
    group_id: &'a str,
}

impl ChatClient {
    /// All conversations of the signed-in user
    pub async fn get_all_chats(&self) -> Result<Envelope<Vec<Chat>>> {
        let request = self.http.request(Method::GET, CHAT_API);
        self.send_authorized(request).await
    }

    /// Open the direct chat with `receiver_id`, creating it if needed
    pub async fn create_or_open(&self, receiver_id: &str) -> Result<Envelope<Value>> {
        let request = self
            .http
            .request(Method::POST, CHAT_API)
            .json(&ReceiverRequest { receiver_id });
        self.send_authorized(request).await
    }

    pub async fn delete_chat(&self, chat_id: &str) -> Result<Envelope<Value>> {
        let request = self
            .http
            .request(Method::PATCH, &chat_path("delete-chat"))
            .json(&ChatIdRequest { chat_id });
        self.send_authorized(request).await
    }

    pub async fn create_group(&self, name: &str, user_ids: &[String]) -> Result<Envelope<Value>> {
        let request = self
            .http
            .request(Method::POST, &chat_path("create-group"))
            .json(&CreateGroupRequest { name, user_ids });
        self.send_authorized(request).await
    }

    pub async fn leave_group(&self, group_id: &str) -> Result<Envelope<Value>> {
        let request = self
            .http
            .request(Method::PATCH, &chat_path("leave-group"))
            .json(&GroupIdRequest { group_id });
        self.send_authorized(request).await
    }
}
