//! HTTP transport for the Task Manager API
//!
//! A single [`Http`] handle is constructed per client and shared by every
//! resource client. Before each request the bearer token is read from
//! storage and attached when present; a missing token never blocks the
//! request since some endpoints are public. A 401 on any response clears
//! the persisted session and broadcasts [`SessionEvent::Expired`] so the
//! session controller (and any embedding UI) can react — navigation is the
//! subscriber's decision, not a transport side effect.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use url::Url;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::store::Storage;

/// Session lifecycle events emitted by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A response carried 401: the persisted session has been cleared
    Expired,
}

/// Generic acknowledgement response (`{"message": ...}` or empty)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    /// Optional human-readable confirmation from the backend
    #[serde(default)]
    pub message: Option<String>,
}

/// Shared HTTP transport handle
#[derive(Clone)]
pub struct Http {
    client: Client,
    base_url: String,
    storage: Storage,
    session_events: broadcast::Sender<SessionEvent>,
}

impl Http {
    pub(crate) fn new(
        base_url: &str,
        storage: Storage,
        options: &ClientOptions,
    ) -> Result<Self, Error> {
        let client = Client::builder().timeout(options.request_timeout).build()?;
        let (session_events, _) = broadcast::channel(16);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            storage,
            session_events,
        })
    }

    /// Subscribe to session lifecycle events
    pub fn subscribe_session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.session_events.subscribe()
    }

    /// Create a GET request
    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::GET)
    }

    /// Create a POST request
    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::POST)
    }

    /// Create a PATCH request
    pub fn patch(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::PATCH)
    }

    /// Create a PUT request
    pub fn put(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::PUT)
    }

    /// Create a DELETE request
    pub fn delete(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::DELETE)
    }

    /// Tear down the persisted session and notify subscribers. Safe to hit
    /// from several concurrent 401 responses.
    fn expire_session(&self) {
        self.storage.clear_session();
        let receivers = self.session_events.send(SessionEvent::Expired).unwrap_or(0);
        debug!(receivers, "session expired by 401 response");
    }
}

/// Helper for building and executing requests against the API
pub struct FetchBuilder<'a> {
    http: &'a Http,
    path: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    fn new(http: &'a Http, path: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        Self {
            http,
            path: path.to_string(),
            method,
            headers,
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add a query parameter to the request
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    fn build_url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(&format!("{}{}", self.http.base_url, self.path))?;
        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn send(self) -> Result<reqwest::Response, Error> {
        let url = self.build_url()?;

        let mut request = self
            .http
            .client
            .request(self.method.clone(), url)
            .headers(self.headers.clone());

        // Token absence is valid: public endpoints carry no credential.
        if let Some(token) = self.http.storage.token() {
            request = request.bearer_auth(token);
        }

        if let Some(body) = self.body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.http.expire_session();
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::from_status(status, &body));
        }

        Ok(response)
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T, Error> {
        let response = self.send().await?;
        let result = response.json::<T>().await?;
        Ok(result)
    }
}
