//! User notifications (polled counts and lists, not pushed)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::{Ack, Http};

/// A notification delivered to the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct UnreadCount {
    count: u64,
}

/// Client for the notifications endpoints
#[derive(Clone)]
pub struct NotificationsClient {
    http: Http,
}

impl NotificationsClient {
    pub(crate) fn new(http: Http) -> Self {
        Self { http }
    }

    /// List notifications, optionally only unread ones
    pub async fn list(&self, unread_only: bool) -> Result<Vec<Notification>, Error> {
        self.http
            .get("/notifications/")
            .query("unread_only", unread_only)
            .execute()
            .await
    }

    /// Number of unread notifications
    pub async fn unread_count(&self) -> Result<u64, Error> {
        let response: UnreadCount = self.http.get("/notifications/unread-count").execute().await?;
        Ok(response.count)
    }

    /// Mark one notification as read
    pub async fn mark_read(&self, notification_id: i64) -> Result<Ack, Error> {
        self.http
            .post("/notifications/mark-read")
            .json(&serde_json::json!({ "notification_id": notification_id }))?
            .execute()
            .await
    }

    /// Mark every notification as read
    pub async fn mark_all_read(&self) -> Result<Ack, Error> {
        self.http.post("/notifications/mark-all-read").execute().await
    }
}
