//! Receiver configuration.
//!
//! Like the sender's config this is a plain struct filled in by the binary.

pub use mows_core::DEFAULT_PORT;

/// All runtime settings of the receiver.
///
/// # Example
///
/// ```rust
/// use mows_receiver::ReceiverConfig;
///
/// let cfg = ReceiverConfig::default();
/// assert_eq!(cfg.host, "0.0.0.0");
/// assert_eq!(cfg.port, 8765);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverConfig {
    /// Interface to bind.  `0.0.0.0` listens on every interface; set
    /// `127.0.0.1` to accept only local senders.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl ReceiverConfig {
    /// Builds a config for `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", DEFAULT_PORT)
    }
}
