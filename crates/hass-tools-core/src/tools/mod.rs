//! Tool registry and the built-in Home Assistant tools
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  ToolRegistry                                │
//! │                                              │
//! │  - definitions in registration order         │
//! │  - advisory or strict argument validation    │
//! │  - dispatch(name, args) -> ToolCallResult    │
//! └──────────────────────────────────────────────┘
//!           │
//!           ▼
//! ┌──────────────────────────────────────────────┐
//! │  Handlers                                    │
//! │    list_* / get_* → QueryEngine → Backend    │
//! │    create_automation → Backend               │
//! └──────────────────────────────────────────────┘
//! ```

pub mod args;
pub mod handlers;
mod registry;

pub use args::{ArgResult, ArgumentError};
pub use handlers::register_builtin_tools;
pub use registry::{
    CallContext, RegistryError, ToolFilter, ToolHandler, ToolRegistry, ValidationMode,
};
