//! Standard listeners.

mod logging;

pub use logging::LoggingListener;
