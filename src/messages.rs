//! Team chat messages
//!
//! Chat is plain HTTP: messages are posted and re-fetched on a timer (see
//! [`crate::poll`]), not pushed. File attachments travel base64-encoded in
//! the message payload.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::Http;

/// Default number of messages fetched per page
pub const DEFAULT_MESSAGE_LIMIT: u32 = 100;

/// A chat message in a team channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub team_id: i64,
    #[serde(default)]
    pub sender_id: Option<i64>,
    #[serde(default)]
    pub sender_name: Option<String>,
    pub message: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    /// Base64-encoded attachment payload, when one was sent
    #[serde(default)]
    pub file_data: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Decode the attachment payload, if present and well-formed
    pub fn decode_attachment(&self) -> Option<Vec<u8>> {
        let data = self.file_data.as_deref()?;
        BASE64.decode(data).ok()
    }
}

/// A file to attach to an outgoing message
#[derive(Debug, Clone)]
pub struct FileAttachment {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl FileAttachment {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }
}

/// Client for the messages endpoints
#[derive(Clone)]
pub struct MessagesClient {
    http: Http,
}

impl MessagesClient {
    pub(crate) fn new(http: Http) -> Self {
        Self { http }
    }

    /// Send a text message to a team channel
    pub async fn send(&self, team_id: i64, text: &str) -> Result<Message, Error> {
        self.http
            .post("/messages/")
            .json(&serde_json::json!({
                "team_id": team_id,
                "message": text,
            }))?
            .execute()
            .await
    }

    /// Send a message with a file attachment
    pub async fn send_with_file(
        &self,
        team_id: i64,
        text: &str,
        attachment: &FileAttachment,
    ) -> Result<Message, Error> {
        self.http
            .post("/messages/")
            .json(&serde_json::json!({
                "team_id": team_id,
                "message": text,
                "file_data": BASE64.encode(&attachment.data),
                "file_name": attachment.name,
                "file_type": attachment.content_type,
            }))?
            .execute()
            .await
    }

    /// Fetch a team channel's recent messages, newest last
    pub async fn for_team(&self, team_id: i64, limit: Option<u32>) -> Result<Vec<Message>, Error> {
        self.http
            .get(&format!("/messages/{team_id}"))
            .query("limit", limit.unwrap_or(DEFAULT_MESSAGE_LIMIT))
            .execute()
            .await
    }
}
