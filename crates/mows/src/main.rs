//! `mows` command-line entry point.
//!
//! One binary, four commands:
//!
//! ```text
//! mows serve [--host H] [--port P]             receiver: replay events locally
//! mows send  [--host H] [--port P] [--suppress] sender: stream local input
//! mows clip push <TEXT> [--host H] [--port P]  set the receiver's clipboard
//! mows clip pull [--host H] [--port P]         print the receiver's clipboard
//! ```
//!
//! # Where settings come from
//!
//! 1. Command-line flags (or their `MOWS_*` environment variables).
//! 2. The TOML file named by `--config` / `MOWS_CONFIG`, if any.
//! 3. Built-in defaults (`0.0.0.0:8765` for `serve`, `localhost:8765` for the
//!    rest).
//!
//! The log filter is `RUST_LOG` when set, otherwise `--log-level`, otherwise
//! the file's `log_level`, otherwise `info`.

mod config;

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mows_receiver::{platform_injectors, run_server, ReceiverConfig};
use mows_sender::infrastructure::input_capture::platform_source;
use mows_sender::{pull_clipboard, push_clipboard, SenderConfig, SenderSession, StopReason};

use crate::config::{load_config, SendSection, ServeSection};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Mouse over WebSocket: share one machine's pointer, keyboard and clipboard
/// with another.
#[derive(Debug, Parser)]
#[command(name = "mows", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, env = "MOWS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (`error`, `warn`, `info`, `debug`, `trace`).  `RUST_LOG`
    /// takes precedence.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Receiver address flags shared by every command.
#[derive(Debug, Args)]
struct Endpoint {
    /// Host to bind (`serve`) or connect to (everything else).
    #[arg(long, env = "MOWS_HOST")]
    host: Option<String>,

    /// WebSocket port.
    #[arg(long, env = "MOWS_PORT")]
    port: Option<u16>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the receiver and replay incoming events on this machine.
    Serve {
        #[command(flatten)]
        endpoint: Endpoint,
    },
    /// Capture local input and stream it to a receiver.  Ctrl+Tab pauses,
    /// Ctrl+Esc stops.
    Send {
        #[command(flatten)]
        endpoint: Endpoint,

        /// Keep the local pointer pinned while streaming.
        #[arg(long)]
        suppress: bool,
    },
    /// Read or write the receiver's clipboard.
    Clip {
        #[command(subcommand)]
        action: ClipCommand,
    },
}

#[derive(Debug, Subcommand)]
enum ClipCommand {
    /// Replace the receiver's clipboard with TEXT.
    Push {
        text: String,

        #[command(flatten)]
        endpoint: Endpoint,
    },
    /// Print the receiver's clipboard.
    Pull {
        #[command(flatten)]
        endpoint: Endpoint,
    },
}

impl Endpoint {
    fn receiver_config(&self, file: &ServeSection) -> ReceiverConfig {
        ReceiverConfig::new(
            self.host.clone().unwrap_or_else(|| file.host.clone()),
            self.port.unwrap_or(file.port),
        )
    }

    fn sender_config(&self, file: &SendSection, suppress: bool) -> SenderConfig {
        SenderConfig::new(
            self.host.clone().unwrap_or_else(|| file.host.clone()),
            self.port.unwrap_or(file.port),
            suppress || file.suppress,
        )
    }
}

/// Picks the level used when `RUST_LOG` is absent.
fn fallback_log_level<'a>(cli: Option<&'a str>, file: Option<&'a str>) -> &'a str {
    cli.or(file).unwrap_or("info")
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let file = load_config(cli.config.as_deref()).context("failed to load configuration")?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    let level = fallback_log_level(cli.log_level.as_deref(), file.log_level.as_deref());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    match cli.command {
        Command::Serve { endpoint } => serve(endpoint.receiver_config(&file.serve)).await,
        Command::Send { endpoint, suppress } => {
            send(endpoint.sender_config(&file.send, suppress)).await
        }
        Command::Clip { action } => match action {
            ClipCommand::Push { text, endpoint } => {
                let url = endpoint.sender_config(&file.send, false).url();
                push_clipboard(&url, &text)
                    .await
                    .with_context(|| format!("clipboard push to {url} failed"))?;
                info!("pushed {} chars to {url}", text.chars().count());
                Ok(())
            }
            ClipCommand::Pull { endpoint } => {
                let url = endpoint.sender_config(&file.send, false).url();
                let text = pull_clipboard(&url)
                    .await
                    .with_context(|| format!("clipboard pull from {url} failed"))?;
                println!("{text}");
                Ok(())
            }
        },
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn serve(config: ReceiverConfig) -> anyhow::Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    // The accept loop re-checks `running` every 200 ms.
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    run_server(config, platform_injectors(), running).await?;
    println!("goodbye");
    Ok(())
}

async fn send(config: SenderConfig) -> anyhow::Result<()> {
    let source = platform_source().context("cannot start input capture")?;

    let (clipboard_tx, mut clipboard_rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        while let Some(text) = clipboard_rx.recv().await {
            info!("clipboard data from receiver ({} chars)", text.chars().count());
        }
    });

    let reason = SenderSession::new(config, source)
        .with_clipboard_sink(clipboard_tx)
        .run()
        .await?;

    match reason {
        StopReason::Hotkey => println!("stopped"),
        StopReason::CaptureLost => println!("stopped: input capture lost"),
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_without_flags_uses_file_section() {
        // Arrange
        let cli = Cli::parse_from(["mows", "serve"]);
        let file = ServeSection {
            host: "127.0.0.1".to_string(),
            port: 9001,
        };

        // Act
        let Command::Serve { endpoint } = cli.command else {
            panic!("expected serve");
        };
        let config = endpoint.receiver_config(&file);

        // Assert
        assert_eq!(config, ReceiverConfig::new("127.0.0.1", 9001));
    }

    #[test]
    fn test_flags_override_file_values() {
        // Arrange
        let cli = Cli::parse_from(["mows", "send", "--host", "desk", "--port", "7000"]);

        // Act
        let Command::Send { endpoint, suppress } = cli.command else {
            panic!("expected send");
        };
        let config = endpoint.sender_config(&SendSection::default(), suppress);

        // Assert
        assert_eq!(config.url(), "ws://desk:7000");
        assert!(!config.suppress);
    }

    #[test]
    fn test_suppress_comes_from_flag_or_file() {
        let file = SendSection {
            suppress: true,
            ..SendSection::default()
        };
        let endpoint = Endpoint {
            host: None,
            port: None,
        };
        assert!(endpoint.sender_config(&file, false).suppress);
        assert!(endpoint.sender_config(&SendSection::default(), true).suppress);
        assert!(!endpoint.sender_config(&SendSection::default(), false).suppress);
    }

    #[test]
    fn test_clip_push_parses_text_and_global_flags() {
        // Arrange / Act
        let cli = Cli::parse_from([
            "mows",
            "clip",
            "push",
            "hello world",
            "--log-level",
            "debug",
        ]);

        // Assert
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Command::Clip {
                action: ClipCommand::Push { text, .. },
            } => assert_eq!(text, "hello world"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["mows"]).is_err());
    }

    #[test]
    fn test_fallback_log_level_precedence() {
        assert_eq!(fallback_log_level(Some("trace"), Some("warn")), "trace");
        assert_eq!(fallback_log_level(None, Some("warn")), "warn");
        assert_eq!(fallback_log_level(None, None), "info");
    }
}
