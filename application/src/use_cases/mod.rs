//! Use cases (application services)

pub mod assemble_response;
pub mod chat_session;
pub mod dispatch_tools;
pub mod session_registry;
pub mod shared_history;
