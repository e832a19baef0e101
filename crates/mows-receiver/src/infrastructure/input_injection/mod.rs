//! Injection capability implementations.
//!
//! [`platform_injectors`] selects the capability once at startup.  OS injection
//! backends are external collaborators; this build ships the in-memory
//! [`headless::HeadlessInjector`], which has no relative-motion primitive and
//! therefore runs the dispatcher's absolute accumulator.

use std::sync::Arc;

use crate::application::dispatch::{InputInjector, MotionInjector};

pub mod headless;
pub mod mock;

/// The injection capability shared by every connection.
#[derive(Clone)]
pub struct Injectors {
    pub input: Arc<dyn InputInjector>,
    /// Relative-motion primitive, when the platform has one.
    pub relative: Option<Arc<dyn MotionInjector>>,
}

impl Injectors {
    pub fn new(input: Arc<dyn InputInjector>, relative: Option<Arc<dyn MotionInjector>>) -> Self {
        Self { input, relative }
    }
}

/// Returns the injection capability for this build.
pub fn platform_injectors() -> Injectors {
    Injectors::new(Arc::new(headless::HeadlessInjector::new()), None)
}
