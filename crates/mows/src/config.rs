//! Optional TOML configuration file for the `mows` binary.
//!
//! Every field has a default, so an empty file (or no file at all) is valid.
//! Values given on the command line win over the file; the file wins over the
//! built-in defaults.
//!
//! ```toml
//! log_level = "debug"
//!
//! [serve]
//! host = "127.0.0.1"
//! port = 8765
//!
//! [send]
//! host = "desk.local"
//! port = 8765
//! suppress = true
//! ```
//!
//! # Serde default values (for beginners)
//!
//! `#[serde(default = "some_fn")]` tells serde to call `some_fn()` when the
//! key is missing, and `#[serde(default)]` on a table uses the table type's
//! `Default` impl when the whole `[section]` is missing.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Error type for reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct MowsConfig {
    /// `tracing` level used when neither `RUST_LOG` nor `--log-level` is set.
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub serve: ServeSection,
    #[serde(default)]
    pub send: SendSection,
}

/// `[serve]`: where the receiver listens.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServeSection {
    #[serde(default = "default_serve_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// `[send]`: which receiver the sender and the `clip` commands connect to.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SendSection {
    #[serde(default = "default_send_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Pin the local pointer while streaming.
    #[serde(default)]
    pub suppress: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_serve_host() -> String {
    mows_receiver::ReceiverConfig::default().host
}
fn default_send_host() -> String {
    mows_sender::SenderConfig::default().host
}
fn default_port() -> u16 {
    mows_core::DEFAULT_PORT
}

impl Default for ServeSection {
    fn default() -> Self {
        Self {
            host: default_serve_host(),
            port: default_port(),
        }
    }
}

impl Default for SendSection {
    fn default() -> Self {
        Self {
            host: default_send_host(),
            port: default_port(),
            suppress: false,
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses configuration from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed or has unknown keys.
pub fn parse_config(content: &str) -> Result<MowsConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads the configuration file at `path`, or the defaults when `path` is
/// `None`.
///
/// A path given explicitly must exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if it is malformed.
pub fn load_config(path: Option<&Path>) -> Result<MowsConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(MowsConfig::default());
    };
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_library_defaults() {
        // Arrange / Act
        let cfg = MowsConfig::default();

        // Assert
        assert_eq!(cfg.log_level, None);
        assert_eq!(cfg.serve.host, "0.0.0.0");
        assert_eq!(cfg.serve.port, 8765);
        assert_eq!(cfg.send.host, "localhost");
        assert_eq!(cfg.send.port, 8765);
        assert!(!cfg.send.suppress);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        assert_eq!(parse_config("").unwrap(), MowsConfig::default());
    }

    #[test]
    fn test_partial_sections_fill_missing_keys_with_defaults() {
        // Arrange
        let text = r#"
            log_level = "debug"

            [send]
            host = "desk.local"
            suppress = true
        "#;

        // Act
        let cfg = parse_config(text).unwrap();

        // Assert
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert_eq!(cfg.send.host, "desk.local");
        assert_eq!(cfg.send.port, 8765);
        assert!(cfg.send.suppress);
        assert_eq!(cfg.serve, ServeSection::default());
    }

    #[test]
    fn test_unknown_key_is_a_parse_error() {
        let err = parse_config("[serve]\nbind = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_wrong_type_is_a_parse_error() {
        let err = parse_config("[serve]\nport = \"eighty\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_without_path_returns_defaults() {
        assert_eq!(load_config(None).unwrap(), MowsConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        // Arrange
        let path = std::env::temp_dir().join(format!("mows-missing-{}.toml", std::process::id()));

        // Act
        let err = load_config(Some(&path)).unwrap_err();

        // Assert
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("mows-missing-"));
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        // Arrange
        let path = std::env::temp_dir().join(format!("mows-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[serve]\nport = 9000\n").unwrap();

        // Act
        let cfg = load_config(Some(&path));
        std::fs::remove_file(&path).unwrap();

        // Assert
        assert_eq!(cfg.unwrap().serve.port, 9000);
    }
}
