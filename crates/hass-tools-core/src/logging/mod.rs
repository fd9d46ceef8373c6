//! Logging abstractions for runtime-agnostic logging

mod console;
pub mod file_logger;
mod noop;
mod traits;

pub use console::{ConsoleLevel, ConsoleLogger};
pub use noop::NoOpLogger;
pub use traits::{Logger, SharedLogger};

pub use file_logger::{log_file_path, LogLevel};
