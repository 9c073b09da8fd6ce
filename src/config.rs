//! Configuration options for the Task Manager client

use std::time::Duration;

/// Configuration options for the Task Manager client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Timeout applied to every outgoing request
    pub request_timeout: Duration,

    /// How often chat messages are re-fetched while a chat view is open
    pub message_poll_interval: Duration,

    /// How often invitation/notification counts are re-fetched
    pub notification_poll_interval: Duration,

    /// Quiet period before a user-search query is sent
    pub search_debounce: Duration,

    /// Minimum query length before user search touches the network
    pub search_min_chars: usize,

    /// How long a toast stays visible before it removes itself
    pub toast_duration: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            message_poll_interval: Duration::from_secs(5),
            notification_poll_interval: Duration::from_secs(10),
            search_debounce: Duration::from_millis(300),
            search_min_chars: 2,
            toast_duration: Duration::from_secs(5),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the chat message poll interval
    pub fn with_message_poll_interval(mut self, value: Duration) -> Self {
        self.message_poll_interval = value;
        self
    }

    /// Set the notification poll interval
    pub fn with_notification_poll_interval(mut self, value: Duration) -> Self {
        self.notification_poll_interval = value;
        self
    }

    /// Set the user-search debounce interval
    pub fn with_search_debounce(mut self, value: Duration) -> Self {
        self.search_debounce = value;
        self
    }

    /// Set the minimum user-search query length
    pub fn with_search_min_chars(mut self, value: usize) -> Self {
        self.search_min_chars = value;
        self
    }

    /// Set the toast auto-hide duration
    pub fn with_toast_duration(mut self, value: Duration) -> Self {
        self.toast_duration = value;
        self
    }
}
