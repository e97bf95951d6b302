//! Renderer implementations.

pub mod browserless;

pub use browserless::{BrowserlessRenderer, DEFAULT_USER_AGENT};
