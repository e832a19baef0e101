//! Sender configuration.
//!
//! [`SenderConfig`] is a plain struct: the `mows` binary fills it from CLI
//! flags and the config file, tests build it directly.  Nothing in this crate
//! reads the environment.

pub use mows_core::DEFAULT_PORT;

/// All runtime settings of one sender session.
///
/// # Example
///
/// ```rust
/// use mows_sender::SenderConfig;
///
/// let cfg = SenderConfig::default();
/// assert_eq!(cfg.url(), "ws://localhost:8765");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderConfig {
    /// Receiver host name or address.
    pub host: String,
    /// Receiver port.
    pub port: u16,
    /// Withhold captured input from the local OS while streaming.
    ///
    /// Only honoured while the session is active; a paused session always
    /// lets input through so the operator can use the local machine.
    pub suppress: bool,
}

impl SenderConfig {
    /// Builds a config for `host:port`.
    pub fn new(host: impl Into<String>, port: u16, suppress: bool) -> Self {
        Self {
            host: host.into(),
            port,
            suppress,
        }
    }

    /// The WebSocket URL the sender connects to.
    pub fn url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self::new("localhost", DEFAULT_PORT, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_uses_host_and_port() {
        let cfg = SenderConfig::new("10.0.0.7", 9000, true);
        assert_eq!(cfg.url(), "ws://10.0.0.7:9000");
    }

    #[test]
    fn test_default_does_not_suppress() {
        assert!(!SenderConfig::default().suppress);
    }
}
