//! Engine observability: structured logging and typed events.
//!
//! Logs are synchronous JSON lines with deterministic key ordering and
//! explicit severities. One log line is one event.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
