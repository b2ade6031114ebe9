//! Routes leveled messages to the configured sinks.
//!
//! With no structured sink configured every record goes to the console sink
//! (standard error). Otherwise each structured sink (syslog, log file)
//! receives the record independently. Debug records are dropped unless debug
//! output is enabled, either in the configuration or at runtime.

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::config::LogConfig;
use crate::error::LogError;
use crate::hexdump::hex_dump_lines;
use crate::severity::Severity;
use crate::sink::{ConsoleSink, FileSink, LogRecord, Sink};

/// The logging front door.
pub struct Dispatcher {
    debug: bool,
    debug_override: AtomicBool,
    console: Mutex<Box<dyn Sink>>,
    sinks: Mutex<Vec<Box<dyn Sink>>>,
}

impl Dispatcher {
    /// Creates a dispatcher that writes only to standard error.
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            debug_override: AtomicBool::new(false),
            console: Mutex::new(Box::new(ConsoleSink::stderr())),
            sinks: Mutex::new(Vec::new()),
        }
    }

    /// Builds a dispatcher from `config`, opening the syslog connection and
    /// the log file as configured.
    pub fn from_config(config: &LogConfig) -> Result<Self, LogError> {
        let mut dispatcher = Self::new(config.debug);

        if let Some(facility) = config.facility()? {
            #[cfg(unix)]
            {
                let sink = crate::sink::SyslogSink::open(&config.ident, facility)?;
                dispatcher = dispatcher.with_sink(sink);
            }
            #[cfg(not(unix))]
            warn!(%facility, "syslog is not available on this platform; ignoring");
        }

        if let Some(path) = &config.logfile {
            let sink = FileSink::open(path, config.timestamps_utc)?;
            dispatcher = dispatcher.with_sink(sink);
        }

        let logfile = config.logfile.as_ref().map(|p| p.display().to_string());
        info!(
            debug = config.debug,
            syslog = config.syslog.as_deref().unwrap_or("-"),
            logfile = logfile.as_deref().unwrap_or("-"),
            utc = config.timestamps_utc,
            "Log dispatcher configured"
        );
        Ok(dispatcher)
    }

    /// Replaces the fallback console sink.
    pub fn with_console(self, console: impl Sink + 'static) -> Self {
        *lock(&self.console) = Box::new(console);
        self
    }

    /// Adds a structured sink. Once one is present the console is no longer used.
    pub fn with_sink(self, sink: impl Sink + 'static) -> Self {
        debug!(sink = sink.name(), "Adding log sink");
        lock(&self.sinks).push(Box::new(sink));
        self
    }

    /// Turns debug output on or off at runtime, on top of the configured setting.
    pub fn set_debug(&self, enabled: bool) {
        self.debug_override.store(enabled, Ordering::Relaxed);
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug || self.debug_override.load(Ordering::Relaxed)
    }

    pub fn sink_count(&self) -> usize {
        lock(&self.sinks).len()
    }

    /// Emits one message. Write failures are counted and otherwise ignored.
    ///
    /// Messages are written verbatim, so callers supply their own line ending.
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        if severity == Severity::Debug && !self.debug_enabled() {
            metrics::counter!("log_records_suppressed").increment(1);
            return;
        }

        let record = LogRecord { severity, args };
        let mut sinks = lock(&self.sinks);
        if sinks.is_empty() {
            let mut console = lock(&self.console);
            write_best_effort(&mut **console, &record);
            return;
        }
        for sink in sinks.iter_mut() {
            write_best_effort(&mut **sink, &record);
        }
    }

    /// Emits a hex dump of `buf`, one [`log`](Self::log) call per line.
    pub fn log_hex(&self, severity: Severity, buf: &[u8]) {
        if severity == Severity::Debug && !self.debug_enabled() {
            metrics::counter!("log_records_suppressed").increment(1);
            return;
        }
        for line in hex_dump_lines(buf) {
            self.log(severity, format_args!("{}\n", line));
        }
    }

    /// Reopens every sink backed by a path, e.g. after log rotation.
    ///
    /// All sinks are attempted; the first failure is returned.
    pub fn reopen(&self) -> io::Result<()> {
        let mut result = Ok(());
        for sink in lock(&self.sinks).iter_mut() {
            if let Err(e) = sink.reopen() {
                warn!(sink = sink.name(), error = %e, "Failed to reopen log sink");
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        info!("Log sinks reopened");
        result
    }

    /// Installs the dispatcher as the global `log` backend.
    pub fn install(self) -> Result<&'static Dispatcher, log::SetLoggerError> {
        let dispatcher: &'static Dispatcher = Box::leak(Box::new(self));
        log::set_logger(dispatcher)?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(dispatcher)
    }
}

impl log::Log for Dispatcher {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        Severity::from(metadata.level()) != Severity::Debug || self.debug_enabled()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            Dispatcher::log(
                self,
                Severity::from(record.level()),
                format_args!("{}\n", record.args()),
            );
        }
    }

    fn flush(&self) {}
}

fn write_best_effort(sink: &mut dyn Sink, record: &LogRecord<'_>) {
    if sink.write_record(record).is_err() {
        metrics::counter!("log_sink_write_failures", "sink" => sink.name().to_string())
            .increment(1);
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic mid-write leaves nothing inconsistent worth refusing to log over.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Logs a formatted message through a [`Dispatcher`].
///
/// ```
/// use flowlog::{flowlog, Dispatcher, Severity};
///
/// let dispatcher = Dispatcher::new(false);
/// flowlog!(dispatcher, Severity::Warning, "peer {} unreachable\n", "192.0.2.1");
/// ```
#[macro_export]
macro_rules! flowlog {
    ($dispatcher:expr, $severity:expr, $($arg:tt)+) => {
        $dispatcher.log($severity, format_args!($($arg)+))
    };
}
