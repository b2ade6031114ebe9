//! Integration tests for routing records to sinks.

mod helpers;

use flowlog::{flowlog, Dispatcher, LogConfig, Severity};
use helpers::mock_sink::{FailableSink, RecordingSink};
use std::fs;

#[test]
fn test_file_sink_line_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowlog.log");
    let config = LogConfig {
        logfile: Some(path.clone()),
        timestamps_utc: true,
        ..Default::default()
    };

    let dispatcher = Dispatcher::from_config(&config).unwrap();
    flowlog!(dispatcher, Severity::Warning, "WARN ( {} ): peer {} down\n", "default", "192.0.2.7");

    let contents = fs::read_to_string(&path).unwrap();
    let line = contents.lines().next().unwrap();
    let (timestamp, rest) = line.split_once(' ').unwrap();
    let (ids, message) = rest.split_once(' ').unwrap();

    // YYYY-MM-DDTHH:MM:SSZ
    assert_eq!(timestamp.len(), 20);
    assert_eq!(&timestamp[10..11], "T");
    assert!(timestamp.ends_with('Z'));
    assert_eq!(ids.split('/').next().unwrap(), std::process::id().to_string());
    assert_eq!(message, "WARN ( default ): peer 192.0.2.7 down");
}

#[test]
fn test_file_sink_local_timestamps_carry_offset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowlog.log");
    let config = LogConfig {
        logfile: Some(path.clone()),
        timestamps_utc: false,
        ..Default::default()
    };

    let dispatcher = Dispatcher::from_config(&config).unwrap();
    dispatcher.log(Severity::Info, format_args!("tick\n"));

    let contents = fs::read_to_string(&path).unwrap();
    let timestamp = contents.split(' ').next().unwrap();
    // YYYY-MM-DDTHH:MM:SS+HH:MM
    assert_eq!(timestamp.len(), 25);
    let sign = &timestamp[19..20];
    assert!(sign == "+" || sign == "-", "unexpected offset in {}", timestamp);
}

#[test]
fn test_file_sink_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowlog.log");
    fs::write(&path, "existing line\n").unwrap();
    let config = LogConfig {
        logfile: Some(path.clone()),
        ..Default::default()
    };

    let dispatcher = Dispatcher::from_config(&config).unwrap();
    dispatcher.log(Severity::Notice, format_args!("first\n"));
    dispatcher.log(Severity::Notice, format_args!("second\n"));

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "existing line");
    assert!(lines[1].ends_with(" first"));
    assert!(lines[2].ends_with(" second"));
}

#[test]
fn test_reopen_follows_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowlog.log");
    let rotated = dir.path().join("flowlog.log.1");
    let config = LogConfig {
        logfile: Some(path.clone()),
        ..Default::default()
    };

    let dispatcher = Dispatcher::from_config(&config).unwrap();
    dispatcher.log(Severity::Info, format_args!("before rotation\n"));

    fs::rename(&path, &rotated).unwrap();
    dispatcher.log(Severity::Info, format_args!("still old file\n"));
    dispatcher.reopen().unwrap();
    dispatcher.log(Severity::Info, format_args!("after rotation\n"));

    let old = fs::read_to_string(&rotated).unwrap();
    let new = fs::read_to_string(&path).unwrap();
    assert_eq!(old.lines().count(), 2);
    assert!(old.contains("still old file"));
    assert_eq!(new.lines().count(), 1);
    assert!(new.contains("after rotation"));
}

#[test]
fn test_debug_records_reach_no_sink_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowlog.log");
    let config = LogConfig {
        logfile: Some(path.clone()),
        debug: false,
        ..Default::default()
    };

    let recording = RecordingSink::new();
    let dispatcher = Dispatcher::from_config(&config)
        .unwrap()
        .with_sink(recording.clone());
    dispatcher.log(Severity::Debug, format_args!("hidden\n"));
    dispatcher.log_hex(Severity::Debug, b"hidden");

    assert!(recording.records().is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_write_failure_is_not_surfaced() {
    let failable = FailableSink::new();
    let dispatcher = Dispatcher::new(false).with_sink(failable.clone());

    failable.set_fail_on_write(true);
    dispatcher.log(Severity::Error, format_args!("lost\n"));
    assert!(failable.inner.records().is_empty());

    failable.set_fail_on_write(false);
    dispatcher.log(Severity::Error, format_args!("delivered\n"));
    assert_eq!(failable.inner.texts(), vec!["delivered\n".to_string()]);
}

#[test]
fn test_hex_dump_through_dispatcher() {
    let recording = RecordingSink::new();
    let dispatcher = Dispatcher::new(false).with_sink(recording.clone());

    dispatcher.log_hex(Severity::Info, b"GET / HTTP/1.1\r\nHost");

    let texts = recording.texts();
    assert_eq!(texts.len(), 2);
    assert_eq!(
        texts[0],
        "0000  47 45 54 20 2f 20 48 54 54 50 2f 31 2e 31 0d 0a  GET / HTTP/1.1..\n"
    );
    assert_eq!(
        texts[1],
        format!("0010  48 6f 73 74{}  Host\n", " ".repeat(36))
    );
}

#[cfg(unix)]
#[test]
fn test_syslog_sink_from_config_accepts_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowlog.log");
    let config = LogConfig {
        syslog: Some("local7".to_string()),
        logfile: Some(path.clone()),
        ident: "flowlog-test".to_string(),
        timestamps_utc: true,
        ..Default::default()
    };

    let dispatcher = Dispatcher::from_config(&config).unwrap();
    assert_eq!(dispatcher.sink_count(), 2);

    // The syslog sink sits ahead of the file sink, so reaching the file means
    // the syslog write returned. A literal `%` must not be read as a format.
    flowlog!(
        dispatcher,
        Severity::Notice,
        "INFO ( {} ): 100% of %s %n buckets flushed\n",
        "default"
    );
    drop(dispatcher);

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.ends_with(" INFO ( default ): 100% of %s %n buckets flushed\n"));
}
