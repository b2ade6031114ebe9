//! Output destinations for log records.
//!
//! A [`Sink`] receives every record the [`Dispatcher`](crate::Dispatcher)
//! routes to it. Sinks report write failures, but the dispatcher drops them:
//! logging is best-effort.

use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::LogError;
use crate::severity::Severity;

/// A single message on its way to the sinks.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub severity: Severity,
    pub args: fmt::Arguments<'a>,
}

/// A destination for log output.
pub trait Sink: Send {
    /// Short name used in diagnostics and metrics labels.
    fn name(&self) -> &str;

    /// Writes and flushes one record.
    fn write_record(&mut self, record: &LogRecord<'_>) -> io::Result<()>;

    /// Reopens the underlying destination after external rotation.
    fn reopen(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes bare messages to a stream, standard error by default.
pub struct ConsoleSink<W: Write + Send = io::Stderr> {
    writer: W,
}

impl ConsoleSink {
    pub fn stderr() -> Self {
        Self {
            writer: io::stderr(),
        }
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> Sink for ConsoleSink<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn write_record(&mut self, record: &LogRecord<'_>) -> io::Result<()> {
        self.writer.write_fmt(record.args)?;
        self.writer.flush()
    }
}

/// Appends timestamped lines of the form `<timestamp> <pid>/<tid> <message>`.
pub struct FileSink {
    writer: Box<dyn Write + Send>,
    path: Option<PathBuf>,
    utc: bool,
}

impl FileSink {
    /// Opens `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>, utc: bool) -> Result<Self, LogError> {
        let path = path.as_ref().to_path_buf();
        let file = open_append(&path).map_err(|source| LogError::OpenLogFile {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            writer: Box::new(file),
            path: Some(path),
            utc,
        })
    }

    /// Wraps an arbitrary writer. Such a sink cannot be reopened.
    pub fn from_writer(writer: impl Write + Send + 'static, utc: bool) -> Self {
        Self {
            writer: Box::new(writer),
            path: None,
            utc,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn prefix(&self) -> String {
        let timestamp = if self.utc {
            format_timestamp(&Utc::now(), true)
        } else {
            format_timestamp(&Local::now(), false)
        };
        format!("{} {}/{} ", timestamp, std::process::id(), current_thread_id())
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn write_record(&mut self, record: &LogRecord<'_>) -> io::Result<()> {
        // Prefix and message go out in a single write.
        let line = format!("{}{}", self.prefix(), record.args);
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()
    }

    fn reopen(&mut self) -> io::Result<()> {
        if let Some(path) = &self.path {
            let file = open_append(path)?;
            self.writer = Box::new(file);
        }
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Renders `YYYY-MM-DDTHH:MM:SS` followed by `Z` in UTC mode or a `±HH:MM`
/// offset otherwise.
pub fn format_timestamp<Tz>(time: &DateTime<Tz>, utc: bool) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: fmt::Display,
{
    if utc {
        time.naive_utc().format("%Y-%m-%dT%H:%M:%SZ").to_string()
    } else {
        // Local mode always carries a numeric offset, +00:00 included.
        time.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
    }
}

/// The kernel id of the calling thread, or 0 where there is none to report.
pub fn current_thread_id() -> i64 {
    #[cfg(target_os = "linux")]
    {
        // SAFETY: gettid takes no arguments and cannot fail.
        unsafe { libc::syscall(libc::SYS_gettid) as i64 }
    }
    #[cfg(not(target_os = "linux"))]
    {
        0
    }
}

#[cfg(unix)]
pub use self::syslog::SyslogSink;

#[cfg(unix)]
mod syslog {
    use std::ffi::CString;
    use std::io;

    use super::{LogRecord, Sink};
    use crate::error::LogError;
    use crate::facility::Facility;

    /// Forwards records to the local syslog daemon through `syslog(3)`.
    ///
    /// `openlog(3)` keeps process-wide state, so only one of these should be
    /// alive at a time.
    pub struct SyslogSink {
        // openlog keeps the pointer, so the string must outlive the sink.
        _ident: CString,
        facility: Facility,
    }

    impl SyslogSink {
        pub fn open(ident: &str, facility: Facility) -> Result<Self, LogError> {
            let ident_c =
                CString::new(ident).map_err(|_| LogError::InvalidIdent(ident.to_string()))?;
            // SAFETY: ident_c lives as long as the sink, which calls closelog on drop.
            unsafe { libc::openlog(ident_c.as_ptr(), libc::LOG_PID, facility.code()) };
            tracing::debug!(ident, %facility, "Opened syslog connection");
            Ok(Self {
                _ident: ident_c,
                facility,
            })
        }

        pub fn facility(&self) -> Facility {
            self.facility
        }
    }

    impl Sink for SyslogSink {
        fn name(&self) -> &str {
            "syslog"
        }

        fn write_record(&mut self, record: &LogRecord<'_>) -> io::Result<()> {
            // Interior NULs would truncate the message; replace them.
            let message = record.args.to_string().replace('\0', "\\0");
            let message = CString::new(message)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            // SAFETY: "%s" consumes exactly the one C string passed.
            unsafe {
                libc::syslog(
                    record.severity.priority() | self.facility.code(),
                    b"%s\0".as_ptr() as *const libc::c_char,
                    message.as_ptr(),
                )
            };
            Ok(())
        }
    }

    impl Drop for SyslogSink {
        fn drop(&mut self) {
            // SAFETY: closelog has no preconditions.
            unsafe { libc::closelog() };
        }
    }
}
