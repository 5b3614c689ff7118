//! History store adapters
//!
//! Implementations of the [`HistoryStore`](colloquy_application::HistoryStore)
//! port:
//!
//! - [`MemoryHistoryStore`]: process-local map, lost on exit
//! - [`FileHistoryStore`]: one JSON document per session under a directory

mod file;
mod memory;

pub use file::FileHistoryStore;
pub use memory::MemoryHistoryStore;
