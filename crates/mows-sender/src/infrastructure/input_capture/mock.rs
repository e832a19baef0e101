//! Mock input source for unit and integration testing.
//!
//! Allows tests to inject synthetic [`RawInputEvent`]s without OS hooks, and
//! records every `start` call with its suppression flag.

use std::sync::{
    mpsc::{self, Sender},
    Mutex,
};
use std::time::{Duration, Instant};

use super::{CaptureError, InputSource, RawInputEvent};

/// A mock implementation of [`InputSource`] that allows tests to inject events.
#[derive(Default)]
pub struct MockInputSource {
    sender: Mutex<Option<Sender<RawInputEvent>>>,
    starts: Mutex<Vec<bool>>,
    stop_count: Mutex<u32>,
    /// Number of further successful starts before `start` fails.
    starts_left: Mutex<Option<u32>>,
}

impl MockInputSource {
    /// Creates a new mock input source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `start` after the next `n` successful ones fail.
    pub fn fail_after_starts(&self, n: u32) {
        *self.starts_left.lock().expect("lock poisoned") = Some(n);
    }

    /// Injects a synthetic callback, as if captured from hardware.
    ///
    /// Returns `false` if the source is not running.
    pub fn inject_event(&self, event: RawInputEvent) -> bool {
        match self.sender.lock().expect("lock poisoned").as_ref() {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }

    /// The suppression flag of every successful `start`, in order.
    pub fn starts(&self) -> Vec<bool> {
        self.starts.lock().expect("lock poisoned").clone()
    }

    /// Number of `stop` calls.
    pub fn stop_count(&self) -> u32 {
        *self.stop_count.lock().expect("lock poisoned")
    }

    /// Returns `true` while a channel is open.
    pub fn is_running(&self) -> bool {
        self.sender.lock().expect("lock poisoned").is_some()
    }

    /// Polls until at least `n` starts happened.  Returns `false` on timeout.
    pub fn wait_until_started(&self, n: usize, timeout: Duration) -> bool {
        self.wait_for(timeout, || {
            self.starts.lock().expect("lock poisoned").len() >= n && self.is_running()
        })
    }

    /// Polls until the source is stopped.  Returns `false` on timeout.
    pub fn wait_until_stopped(&self, timeout: Duration) -> bool {
        self.wait_for(timeout, || !self.is_running())
    }

    fn wait_for(&self, timeout: Duration, done: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if done() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        done()
    }
}

impl InputSource for MockInputSource {
    fn start(&self, suppress: bool) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError> {
        if let Some(left) = self.starts_left.lock().expect("lock poisoned").as_mut() {
            if *left == 0 {
                return Err(CaptureError::StartFailed("mock start refused".to_string()));
            }
            *left -= 1;
        }
        let (tx, rx) = mpsc::channel();
        *self.sender.lock().expect("lock poisoned") = Some(tx);
        self.starts.lock().expect("lock poisoned").push(suppress);
        Ok(rx)
    }

    fn stop(&self) {
        // Dropping the sender closes the channel.
        *self.sender.lock().expect("lock poisoned") = None;
        *self.stop_count.lock().expect("lock poisoned") += 1;
    }
}
