//! Backend collaborators the query engine and tool handlers read from
//!
//! - `MemoryBackend`: In-memory records with failure injection
//! - `RestBackend`: Home Assistant REST API over `reqwest`

mod memory;
mod rest;
mod traits;

pub use memory::MemoryBackend;
pub use rest::{RestBackend, RestBackendConfig};
pub use traits::{Backend, BackendError, BackendResult};
