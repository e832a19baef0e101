//! mows-receiver library entry point.
//!
//! The receiver accepts one sender connection at a time and replays every
//! event it receives through an injection capability.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the `mows` binary share the same module tree.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::dispatch::{
    DispatchError, Dispatcher, InjectionError, InputInjector, MotionInjector,
};
pub use domain::config::ReceiverConfig;
pub use infrastructure::input_injection::{platform_injectors, Injectors};
pub use infrastructure::network::server::{run_server, serve_listener};
