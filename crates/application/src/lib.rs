//! Application layer - Use cases and orchestration
//!
//! Owns the active speaker and the shared playback device, keeps the
//! pause/resume control in step with device notifications, and runs the
//! event loop that a front end feeds with UI events.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
