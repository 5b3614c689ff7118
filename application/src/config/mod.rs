//! Application-level configuration.
//!
//! - [`SessionConfig`]: per-registry session parameters (model, history
//!   capacity, lifetimes, deadlines, system messages)
//! - [`StreamPolicy`]: when the tool-proposing turn streams

pub mod session_config;

pub use session_config::{SessionConfig, StreamPolicy};
