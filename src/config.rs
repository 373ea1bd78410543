//! Client configuration.

use std::time::Duration;

/// Host used when the caller does not name one.
pub const DEFAULT_HOST: &str = "localhost:1234";
/// Protocol version path segment.
pub const PROTOCOL_VERSION: &str = "v1";
/// Content type of request and response bodies.
pub const MSGPACK_CONTENT_TYPE: &str = "application/x-msgpack";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Network address of the notebook server, e.g. `"localhost:1234"`.
    pub host: String,
    /// Whole-request deadline. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Connect deadline. `None` leaves it to the OS.
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            timeout: None,
            connect_timeout: None,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
