//! Tool providers and the tool registry
//!
//! ## Providers
//!
//! Tools are organized into providers:
//! - `builtin`: local tools (current_time, echo), always available
//!
//! Hosts plug further providers into the [`ToolRegistry`] through the
//! [`ToolProvider`](colloquy_domain::ToolProvider) trait.

pub mod builtin;
pub mod clock;
pub mod echo;

mod registry;

pub use builtin::BuiltinProvider;
pub use registry::{RegistryStats, ToolRegistry};

use colloquy_domain::ToolCatalogue;

/// Catalogue of every built-in tool
pub fn builtin_catalogue() -> ToolCatalogue {
    ToolCatalogue::new()
        .register(clock::current_time_definition())
        .register(echo::echo_definition())
}
