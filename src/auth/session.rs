//! Session state controller
//!
//! Tracks the signed-in session as a small state machine:
//!
//! ```text
//! Anonymous -> Restoring -> Authenticated -> Anonymous
//! ```
//!
//! State is published through a `watch` channel so route guards and other
//! observers react to transitions without polling. The token and cached
//! user are set and cleared together — no published snapshot carries one
//! without the other while authenticated.

use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::auth::{AuthApi, Credentials, SignupData, User};
use crate::error::Error;
use crate::fetch::SessionEvent;
use crate::store::Storage;

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token
    Anonymous,
    /// Token found in storage, profile fetch in flight
    Restoring,
    /// Token and user both present
    Authenticated,
}

/// Observable session snapshot
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub token: Option<String>,
    pub user: Option<User>,
}

impl SessionSnapshot {
    fn anonymous() -> Self {
        Self {
            state: SessionState::Anonymous,
            token: None,
            user: None,
        }
    }

    fn authenticated(token: String, user: User) -> Self {
        Self {
            state: SessionState::Authenticated,
            token: Some(token),
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }
}

/// What a route guard should render for a given session snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session restore in flight: render a loading placeholder
    ShowLoading,
    /// Not signed in: redirect to the login route
    RedirectToLogin,
    /// Signed in: render the protected content
    Render,
}

/// Pure route-guard function over the session state
pub fn route_decision(snapshot: &SessionSnapshot) -> RouteDecision {
    match snapshot.state {
        SessionState::Restoring => RouteDecision::ShowLoading,
        SessionState::Anonymous => RouteDecision::RedirectToLogin,
        SessionState::Authenticated => RouteDecision::Render,
    }
}

/// Holds the current session and exposes login/signup/logout/refresh
pub struct SessionController {
    api: AuthApi,
    storage: Storage,
    snapshot: watch::Sender<SessionSnapshot>,
}

impl SessionController {
    pub(crate) fn new(api: AuthApi, storage: Storage) -> Self {
        let (snapshot, _) = watch::channel(SessionSnapshot::anonymous());
        Self {
            api,
            storage,
            snapshot,
        }
    }

    /// Subscribe to session state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    /// The current session snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Restore a persisted session.
    ///
    /// When both a token and a cached user exist, the pair is published as
    /// `Authenticated` immediately so route guards never block on network,
    /// then the profile is revalidated in the same call. A failed
    /// revalidation keeps the stale session; the global 401 path is the
    /// only forced logout.
    pub async fn restore(&self) {
        let Some(token) = self.storage.token() else {
            self.snapshot.send_replace(SessionSnapshot::anonymous());
            return;
        };

        match self.storage.user() {
            Some(user) => {
                self.snapshot
                    .send_replace(SessionSnapshot::authenticated(token, user));

                if let Err(err) = self.refresh_user().await {
                    debug!(error = %err, "session revalidation failed, keeping cached session");
                }
            }
            None => {
                // Token without a cached user: the profile fetch gates the
                // transition, so guards show a loading placeholder.
                self.snapshot.send_replace(SessionSnapshot {
                    state: SessionState::Restoring,
                    token: Some(token),
                    user: None,
                });

                if let Err(err) = self.refresh_user().await {
                    debug!(error = %err, "restore failed with no cached user");
                    // Keep the token for a later retry unless 401 already
                    // cleared it, but settle the published state.
                    self.snapshot.send_replace(SessionSnapshot::anonymous());
                }
            }
        }
    }

    /// Log in with email and password.
    ///
    /// On success the token is persisted and the full profile fetched; if
    /// the profile fetch fails the session falls back to a minimal user
    /// derived from the email local-part. Rejected credentials propagate
    /// to the caller and leave the state untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        let response = self.api.login(&Credentials::new(email, password)).await?;

        self.storage.set_token(&response.access_token);

        let user = match self.api.profile().await {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "profile fetch after login failed, deriving user from email");
                User::from_email(email)
            }
        };

        self.storage.set_user(&user);
        self.snapshot
            .send_replace(SessionSnapshot::authenticated(response.access_token, user.clone()));

        Ok(user)
    }

    /// Register a new account, then log in with the same credentials
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, Error> {
        self.api
            .signup(&SignupData::new(name, email, password))
            .await?;
        self.login(email, password).await
    }

    /// Log out synchronously: storage and the published snapshot are both
    /// cleared before this returns, so route guards never flash protected
    /// content. Idempotent.
    pub fn logout(&self) {
        self.storage.clear_session();
        self.snapshot.send_replace(SessionSnapshot::anonymous());
    }

    /// Re-fetch the profile and overwrite the cached copy. Used after any
    /// profile-mutating action to keep displayed state consistent.
    pub async fn refresh_user(&self) -> Result<User, Error> {
        match self.api.profile().await {
            Ok(user) => {
                self.storage.set_user(&user);
                self.snapshot.send_modify(|snapshot| {
                    snapshot.user = Some(user.clone());
                    if snapshot.token.is_some() {
                        snapshot.state = SessionState::Authenticated;
                    }
                });
                Ok(user)
            }
            Err(err) => {
                // The transport has already cleared storage on 401; mirror
                // that in the published state.
                if err.is_auth() {
                    self.logout();
                }
                Err(err)
            }
        }
    }

    /// Consume session events from the transport until the channel closes.
    /// A 401 anywhere tears the session down exactly once; repeated events
    /// are harmless.
    pub async fn listen(&self, mut events: broadcast::Receiver<SessionEvent>) {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Expired) => {
                    if self.snapshot.borrow().state != SessionState::Anonymous {
                        debug!("session expired, forcing logout");
                    }
                    self.logout();
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "session event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
