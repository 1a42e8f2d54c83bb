//! HTTP client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default connect timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: i64 = 10_000;
/// Default response timeout in milliseconds.
pub const DEFAULT_RESPONSE_TIMEOUT_MS: i64 = 10_000;
/// Default idle-read timeout in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: i64 = 10_000;
/// Default idle-write timeout in milliseconds.
pub const DEFAULT_WRITE_TIMEOUT_MS: i64 = 2_000;

/// Timeout configuration for a [`ReactiveHttpClient`](crate::ReactiveHttpClient).
///
/// Values are plain milliseconds and are not validated here. Zero disables
/// the corresponding timeout; negative values are rejected when the client
/// is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Bounds the connection-establishment phase.
    #[serde(rename = "connectionTimeoutInMillis", alias = "connect_timeout_ms")]
    pub connect_timeout_ms: i64,
    /// Bounds the time from dispatch until response headers arrive.
    #[serde(rename = "responseTimeoutInMillis", alias = "response_timeout_ms")]
    pub response_timeout_ms: i64,
    /// Idle-read watchdog.
    #[serde(rename = "readTimeOutInMillis", alias = "read_timeout_ms")]
    pub read_timeout_ms: i64,
    /// Idle-write watchdog.
    #[serde(rename = "writeTimeoutInMillis", alias = "write_timeout_ms")]
    pub write_timeout_ms: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Connect timeout, `None` when disabled.
    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    /// Response timeout, `None` when disabled.
    pub fn response_timeout(&self) -> Option<Duration> {
        millis(self.response_timeout_ms)
    }

    /// Idle-read timeout, `None` when disabled.
    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    /// Idle-write timeout, `None` when disabled.
    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    /// Name and value of the first negative timeout, if any.
    pub(crate) fn first_negative(&self) -> Option<(&'static str, i64)> {
        [
            ("connectionTimeoutInMillis", self.connect_timeout_ms),
            ("responseTimeoutInMillis", self.response_timeout_ms),
            ("readTimeOutInMillis", self.read_timeout_ms),
            ("writeTimeoutInMillis", self.write_timeout_ms),
        ]
        .into_iter()
        .find(|(_, value)| *value < 0)
    }
}

fn millis(value: i64) -> Option<Duration> {
    u64::try_from(value)
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the connect timeout in milliseconds.
    pub fn connection_timeout_in_millis(mut self, millis: i64) -> Self {
        self.config.connect_timeout_ms = millis;
        self
    }

    /// Set the response timeout in milliseconds.
    pub fn response_timeout_in_millis(mut self, millis: i64) -> Self {
        self.config.response_timeout_ms = millis;
        self
    }

    /// Set the idle-read timeout in milliseconds.
    pub fn read_timeout_in_millis(mut self, millis: i64) -> Self {
        self.config.read_timeout_ms = millis;
        self
    }

    /// Set the idle-write timeout in milliseconds.
    pub fn write_timeout_in_millis(mut self, millis: i64) -> Self {
        self.config.write_timeout_ms = millis;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
