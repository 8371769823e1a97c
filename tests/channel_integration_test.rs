// Integration tests for the configuration loader and the live channels:
// channel isolation, line formats, append contract and fail-fast loading.

use logchan::{ConfigError, Formatter, Handler, Level, Loader, Logger, Registry, DEFAULT_CONF};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// In-memory writer used to capture what a stream sink would print
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Split a rendered line into (timestamp, rest) and check the date shape
fn parse_timestamp(line: &str) -> (&str, &str) {
    let (timestamp, rest) = line.split_once(" - ").expect("line has a timestamp field");
    chrono::NaiveDateTime::parse_from_str(timestamp, "%d/%m/%Y %H:%M:%S")
        .expect("timestamp matches dd/mm/yyyy HH:MM:SS");
    (timestamp, rest)
}

#[test]
fn test_load_produces_two_named_channels() {
    let temp_dir = TempDir::new().unwrap();
    let registry = Loader::load(DEFAULT_CONF, temp_dir.path().join("viewer.log")).unwrap();

    assert_eq!(registry.len(), 2);
    assert!(registry.get("root").is_some());
    assert!(registry.get("consoleLog").is_some());
    assert!(registry.get("fileLog").is_none());

    let mut names: Vec<&str> = registry.names().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["consoleLog", "root"]);
}

#[test]
fn test_file_channel_line_format() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("viewer.log");
    let registry = Loader::load(DEFAULT_CONF, &log_path).unwrap();

    registry.root().info("bounding box saved").unwrap();

    let contents = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);

    let (_, rest) = parse_timestamp(lines[0]);
    assert_eq!(rest, "root - INFO - bounding box saved");
}

#[test]
fn test_console_channel_never_reaches_file() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("viewer.log");
    let registry = Loader::load(DEFAULT_CONF, &log_path).unwrap();

    let console = registry.get("consoleLog").unwrap();
    console.warning("printed to stdout only").unwrap();
    registry.root().debug("file only").unwrap();

    let contents = fs::read_to_string(&log_path).unwrap();
    assert!(!contents.contains("printed to stdout only"));
    assert!(contents.contains("file only"));
}

#[test]
fn test_console_line_format_omits_name() {
    // The console formatter's output is asserted through the writer seam,
    // assembling the channel programmatically the way the loader does.
    let buf = SharedBuf::default();
    let formatter = Formatter::new(
        "%(asctime)s - %(levelname)s - %(message)s",
        Some("%d/%m/%Y %H:%M:%S"),
    )
    .unwrap();
    let handler = Arc::new(Handler::writer(
        Box::new(buf.clone()),
        Level::Debug,
        formatter,
    ));
    let console = Arc::new(Logger::new(
        "consoleLog",
        Level::Debug,
        vec![handler],
        false,
        None,
    ));
    let registry = Registry::new(
        Arc::new(Logger::new("root", Level::Debug, vec![], false, None)),
        HashMap::from([("consoleLog".to_string(), console)]),
    );

    registry
        .get("consoleLog")
        .unwrap()
        .error("checkbox state lost")
        .unwrap();

    let contents = buf.contents();
    let (_, rest) = parse_timestamp(contents.trim_end());
    assert_eq!(rest, "ERROR - checkbox state lost");
    assert!(!contents.contains("consoleLog"));
}

#[test]
fn test_reload_appends_without_truncating() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("viewer.log");

    {
        let registry = Loader::load(DEFAULT_CONF, &log_path).unwrap();
        registry.root().info("first session").unwrap();
    }
    {
        let registry = Loader::load(DEFAULT_CONF, &log_path).unwrap();
        registry.root().info("second session").unwrap();
    }

    let contents = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("first session"));
    assert!(lines[1].ends_with("second session"));
}

#[test]
fn test_missing_directory_fails_before_any_record() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("no/such/dir/viewer.log");

    let err = Loader::load(DEFAULT_CONF, &log_path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(!log_path.exists(), "nothing may be created on failure");
}

#[test]
fn test_debug_level_passes_through_both_gates() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("viewer.log");
    let registry = Loader::load(DEFAULT_CONF, &log_path).unwrap();

    // Both the logger and handler sit at DEBUG, so every severity lands.
    let root = registry.root();
    root.debug("d").unwrap();
    root.info("i").unwrap();
    root.warning("w").unwrap();
    root.error("e").unwrap();
    root.critical("c").unwrap();

    let contents = fs::read_to_string(&log_path).unwrap();
    assert_eq!(contents.lines().count(), 5);
    for (line, level) in contents
        .lines()
        .zip(["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])
    {
        let (_, rest) = parse_timestamp(line);
        assert!(rest.starts_with(&format!("root - {level} - ")));
    }
}

#[test]
fn test_load_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let conf_path = temp_dir.path().join("logging.conf");
    let log_path = temp_dir.path().join("viewer.log");
    fs::write(&conf_path, DEFAULT_CONF).unwrap();

    let registry = Loader::load_file(&conf_path, &log_path).unwrap();
    registry.root().info("loaded from disk").unwrap();

    let contents = fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("loaded from disk"));
}

#[test]
fn test_concurrent_channel_use() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("viewer.log");
    let registry = Loader::load(DEFAULT_CONF, &log_path).unwrap();

    let root = Arc::clone(registry.root());
    let mut threads = vec![];
    for i in 0..8 {
        let root = Arc::clone(&root);
        threads.push(std::thread::spawn(move || {
            for j in 0..20 {
                root.info(&format!("thread {i} message {j}")).unwrap();
            }
        }));
    }
    for thread in threads {
        thread.join().unwrap();
    }

    let contents = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 160);
    for line in lines {
        let (_, rest) = parse_timestamp(line);
        assert!(rest.starts_with("root - INFO - thread "));
    }
}
