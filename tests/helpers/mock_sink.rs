#![allow(dead_code)]
use flowlog::{LogRecord, Severity, Sink};
use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

/// A mock Sink that keeps every record it receives.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub records: Arc<Mutex<Vec<(Severity, String)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.records().into_iter().map(|(_, text)| text).collect()
    }
}

impl Sink for RecordingSink {
    fn name(&self) -> &str {
        "recording_mock"
    }

    fn write_record(&mut self, record: &LogRecord<'_>) -> io::Result<()> {
        self.records
            .lock()
            .unwrap()
            .push((record.severity, record.args.to_string()));
        Ok(())
    }
}

/// A mock Sink whose writes can be switched to fail.
#[derive(Clone, Debug, Default)]
pub struct FailableSink {
    pub inner: RecordingSink,
    fail_on_write: Arc<AtomicBool>,
}

impl FailableSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_on_write(&self, fail: bool) {
        self.fail_on_write.store(fail, Ordering::SeqCst);
    }
}

impl Sink for FailableSink {
    fn name(&self) -> &str {
        "failable_mock"
    }

    fn write_record(&mut self, record: &LogRecord<'_>) -> io::Result<()> {
        if self.fail_on_write.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "Simulated write failure"));
        }
        self.inner.write_record(record)
    }
}
