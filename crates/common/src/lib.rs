//! PtzCam Common Utilities
//!
//! Shared infrastructure for all PtzCam crates:
//! - Error taxonomy and result aliases
//! - Pacing clocks (real and simulated) used to space motion commands
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
