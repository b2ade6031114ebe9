/// flowlog - logging and alert suppression for network telemetry daemons
///
/// This library provides a small log dispatcher that routes leveled messages
/// to stderr, syslog or a log file, and self-expiring notification flags used
/// to keep a repeating condition from flooding those logs.
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod facility;
pub mod hexdump;
pub mod notification;
pub mod severity;
pub mod sink;

// Re-export core types for convenience
pub use config::LogConfig;
pub use dispatcher::Dispatcher;
pub use error::LogError;
pub use facility::{parse_log_facility, Facility, FacilityError};
pub use notification::{LogNotifications, NotificationError, NotificationFlag};
pub use severity::Severity;
pub use sink::{ConsoleSink, FileSink, LogRecord, Sink};
