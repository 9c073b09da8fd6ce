//! Team invitations and user search
//!
//! [`UserSearch`] wraps the search endpoint in a debounce worker: callers
//! submit every keystroke, the worker waits out the quiet period and sends
//! exactly one request carrying the final query. Queries below the minimum
//! length never touch the network.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::Error;
use crate::fetch::{Ack, Http};

/// Lifecycle status of an invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Rejected => "rejected",
        }
    }
}

/// A team invitation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    pub id: i64,
    pub team_id: i64,
    #[serde(default)]
    pub sender_id: Option<i64>,
    #[serde(default)]
    pub receiver_id: Option<i64>,
    pub status: InvitationStatus,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
}

/// A user matched by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMatch {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub code_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Client for the invitations endpoints
#[derive(Clone)]
pub struct InvitationsClient {
    http: Http,
}

impl InvitationsClient {
    pub(crate) fn new(http: Http) -> Self {
        Self { http }
    }

    /// Invite a user to a team
    pub async fn send(&self, receiver_id: i64, team_id: i64) -> Result<Invitation, Error> {
        self.http
            .post("/invitations/")
            .json(&serde_json::json!({
                "receiver_id": receiver_id,
                "team_id": team_id,
            }))?
            .execute()
            .await
    }

    /// List invitations received by the signed-in user, optionally
    /// filtered by status
    pub async fn received(
        &self,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, Error> {
        let mut request = self.http.get("/invitations/received");
        if let Some(status) = status {
            request = request.query("status", status.as_str());
        }
        request.execute().await
    }

    /// List invitations sent by the signed-in user
    pub async fn sent(&self) -> Result<Vec<Invitation>, Error> {
        self.http.get("/invitations/sent").execute().await
    }

    /// Accept an invitation
    pub async fn accept(&self, invitation_id: i64) -> Result<Ack, Error> {
        self.http
            .post("/invitations/accept")
            .json(&serde_json::json!({ "invitation_id": invitation_id }))?
            .execute()
            .await
    }

    /// Reject an invitation
    pub async fn reject(&self, invitation_id: i64) -> Result<Ack, Error> {
        self.http
            .post("/invitations/reject")
            .json(&serde_json::json!({ "invitation_id": invitation_id }))?
            .execute()
            .await
    }

    /// Search users to invite
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserMatch>, Error> {
        self.http
            .get("/invitations/search-users")
            .query("q", query)
            .execute()
            .await
    }
}

/// Debounced wrapper around [`InvitationsClient::search_users`].
///
/// Must be created inside a tokio runtime; the worker task is aborted
/// when the handle is dropped.
pub struct UserSearch {
    queries: mpsc::UnboundedSender<String>,
    results: watch::Receiver<Vec<UserMatch>>,
    worker: JoinHandle<()>,
}

impl UserSearch {
    pub fn new(client: InvitationsClient, debounce: Duration, min_chars: usize) -> Self {
        let (queries, rx) = mpsc::unbounded_channel::<String>();
        let (results_tx, results) = watch::channel(Vec::new());

        let worker = tokio::spawn(Self::run(client, rx, results_tx, debounce, min_chars));

        Self {
            queries,
            results,
            worker,
        }
    }

    /// Submit the current query text. Call on every keystroke; only the
    /// final text within a quiet period reaches the network.
    pub fn query(&self, text: impl Into<String>) {
        // Send failure means the worker is gone; nothing to do.
        let _ = self.queries.send(text.into());
    }

    /// Subscribe to published search results
    pub fn results(&self) -> watch::Receiver<Vec<UserMatch>> {
        self.results.clone()
    }

    async fn run(
        client: InvitationsClient,
        mut queries: mpsc::UnboundedReceiver<String>,
        results: watch::Sender<Vec<UserMatch>>,
        debounce: Duration,
        min_chars: usize,
    ) {
        while let Some(mut query) = queries.recv().await {
            // Absorb further keystrokes until the quiet period elapses.
            loop {
                match tokio::time::timeout(debounce, queries.recv()).await {
                    Ok(Some(next)) => query = next,
                    Ok(None) => break,
                    Err(_) => break,
                }
            }

            if query.chars().count() < min_chars {
                // Too short for the network; drop any published results so
                // a UI never shows matches for a deleted query.
                results.send_replace(Vec::new());
                continue;
            }

            match client.search_users(&query).await {
                Ok(matches) => {
                    results.send_replace(matches);
                }
                Err(err) => {
                    // Keep the previous results on a failed refresh.
                    warn!(error = %err, "user search failed");
                }
            }
        }
    }
}

impl Drop for UserSearch {
    fn drop(&mut self) {
        self.worker.abort();
    }
}
