//! Task Manager Rust Client Library
//!
//! A Rust client for the Task Manager collaborative task-management API:
//! authentication and sessions, teams, projects, tasks, invitations, team
//! chat, and notifications.
//!
//! The [`TaskManager`] struct is the entry point. It owns the shared HTTP
//! transport, the client-local storage, and the session controller; every
//! resource client is a cheap handle over the same transport.

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod invitations;
pub mod messages;
pub mod notifications;
pub mod poll;
pub mod projects;
pub mod store;
pub mod tasks;
pub mod teams;
pub mod toast;

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::auth::{AuthApi, SessionController};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{Http, SessionEvent};
use crate::invitations::{InvitationsClient, UserSearch};
use crate::messages::{Message, MessagesClient};
use crate::notifications::NotificationsClient;
use crate::poll::Poller;
use crate::projects::ProjectsClient;
use crate::store::Storage;
use crate::tasks::TasksClient;
use crate::teams::TeamsClient;
use crate::toast::ToastStore;

/// The main entry point for the Task Manager client
pub struct TaskManager {
    http: Http,
    storage: Storage,
    options: ClientOptions,
    session: Arc<SessionController>,
    toasts: ToastStore,
}

impl TaskManager {
    /// Create a new client with in-memory storage and default options
    ///
    /// # Example
    ///
    /// ```
    /// use taskmanager_client::TaskManager;
    ///
    /// # fn main() -> Result<(), taskmanager_client::error::Error> {
    /// let client = TaskManager::new("http://localhost:8000")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_storage(base_url, Storage::in_memory(), ClientOptions::default())
    }

    /// Create a new client with explicit storage and options
    ///
    /// # Example
    ///
    /// ```no_run
    /// use taskmanager_client::{config::ClientOptions, store::Storage, TaskManager};
    ///
    /// # fn main() -> Result<(), taskmanager_client::error::Error> {
    /// let storage = Storage::on_disk("/tmp/taskmanager".into());
    /// let client = TaskManager::with_storage(
    ///     "http://localhost:8000",
    ///     storage,
    ///     ClientOptions::default(),
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_storage(
        base_url: &str,
        storage: Storage,
        options: ClientOptions,
    ) -> Result<Self, Error> {
        let http = Http::new(base_url, storage.clone(), &options)?;
        let session = Arc::new(SessionController::new(
            AuthApi::new(http.clone()),
            storage.clone(),
        ));
        let toasts = ToastStore::new(options.toast_duration);

        Ok(Self {
            http,
            storage,
            options,
            session,
            toasts,
        })
    }

    /// The session state controller
    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// The toast store
    pub fn toasts(&self) -> &ToastStore {
        &self.toasts
    }

    /// The client-local storage handle
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The configured client options
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Subscribe to session lifecycle events emitted by the transport.
    /// Feed the receiver to [`SessionController::listen`] or react to
    /// forced teardown directly (e.g. navigate to the login route).
    pub fn subscribe_session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.http.subscribe_session_events()
    }

    /// Spawn the background task that keeps the session controller in
    /// sync with transport-level 401s. Must be called inside a tokio
    /// runtime. The task ends when the client is dropped.
    pub fn spawn_session_listener(&self) -> tokio::task::JoinHandle<()> {
        let session = Arc::clone(&self.session);
        let events = self.subscribe_session_events();
        tokio::spawn(async move { session.listen(events).await })
    }

    /// Client for the auth endpoints
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.http.clone())
    }

    /// Client for the teams endpoints
    pub fn teams(&self) -> TeamsClient {
        TeamsClient::new(self.http.clone())
    }

    /// Client for the projects endpoints
    pub fn projects(&self) -> ProjectsClient {
        ProjectsClient::new(self.http.clone())
    }

    /// Client for the tasks endpoints
    pub fn tasks(&self) -> TasksClient {
        TasksClient::new(self.http.clone())
    }

    /// Client for the invitations endpoints
    pub fn invitations(&self) -> InvitationsClient {
        InvitationsClient::new(self.http.clone())
    }

    /// Client for the messages endpoints
    pub fn messages(&self) -> MessagesClient {
        MessagesClient::new(self.http.clone())
    }

    /// Client for the notifications endpoints
    pub fn notifications(&self) -> NotificationsClient {
        NotificationsClient::new(self.http.clone())
    }

    /// Debounced user search with the configured debounce and minimum
    /// query length. Must be called inside a tokio runtime.
    pub fn user_search(&self) -> UserSearch {
        UserSearch::new(
            self.invitations(),
            self.options.search_debounce,
            self.options.search_min_chars,
        )
    }

    /// Poll a team's chat messages on the configured interval. Returns
    /// the polling handle and a receiver holding the latest message list;
    /// dropping the handle stops the polling.
    pub fn poll_messages(&self, team_id: i64) -> (Poller, watch::Receiver<Vec<Message>>) {
        let (tx, rx) = watch::channel(Vec::new());
        let tx = Arc::new(tx);
        let client = self.messages();

        let poller = Poller::spawn(self.options.message_poll_interval, move || {
            let client = client.clone();
            let tx = Arc::clone(&tx);
            async move {
                let messages = client.for_team(team_id, None).await?;
                tx.send_replace(messages);
                Ok(())
            }
        });

        (poller, rx)
    }

    /// Poll the unread notification count on the configured interval.
    /// A failed cycle keeps the previous count.
    pub fn poll_unread_count(&self) -> (Poller, watch::Receiver<u64>) {
        let (tx, rx) = watch::channel(0);
        let tx = Arc::new(tx);
        let client = self.notifications();

        let poller = Poller::spawn(self.options.notification_poll_interval, move || {
            let client = client.clone();
            let tx = Arc::clone(&tx);
            async move {
                let count = client.unread_count().await?;
                tx.send_replace(count);
                Ok(())
            }
        });

        (poller, rx)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{RouteDecision, SessionState};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::tasks::{Priority, TaskStatus};
    pub use crate::toast::Severity;
    pub use crate::TaskManager;
}
