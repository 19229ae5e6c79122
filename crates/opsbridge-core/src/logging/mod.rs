//! Logging abstractions for runtime-agnostic logging
//!
//! Components receive an `Arc<dyn Logger>` so the binary decides where
//! output goes. The CLI wires in [`TracingLogger`]; tests use [`NoOpLogger`].

mod traits;
mod noop;
mod console;
mod tracing_logger;

pub use traits::{Logger, LoggerExt, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use tracing_logger::TracingLogger;
