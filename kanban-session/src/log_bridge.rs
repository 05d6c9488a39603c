use env_logger::{Logger, Target};
use log::{Log, Metadata, Record, SetLoggerError};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp_ms: u64,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    fn now(level: &str, target: &str, message: &str) -> Self {
        Self {
            timestamp_ms: std::time::SystemTime::now()
                .duration_since(std::time::SystemTime::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
            level: level.to_string(),
            target: target.to_string(),
            message: message.to_string(),
        }
    }
}

struct LogFile {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl LogFile {
    fn new(path: &Path) -> Self {
        let file = Self::open(path).ok();
        Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        }
    }

    fn open(path: &Path) -> io::Result<File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

    fn append_entry(&self, entry: &LogEntry) {
        let mut guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        if guard.is_none() {
            match Self::open(&self.path) {
                Ok(file) => *guard = Some(file),
                Err(_) => return,
            }
        }
        if let Some(file) = guard.as_mut() {
            let line = format_log_line(entry);
            let _ = file.write_all(line.as_bytes());
            let _ = file.write_all(b"\n");
            let _ = file.flush();
        }
    }
}

fn format_log_line(entry: &LogEntry) -> String {
    format!(
        "{} [{}] [{}] {}",
        entry.timestamp_ms,
        entry.level.to_uppercase(),
        entry.target,
        entry.message.replace('\n', "\\n")
    )
}

/// Forwards records to env_logger (stderr) and appends them to the log file.
struct FileTeeLogger {
    inner: Logger,
    file: LogFile,
}

impl Log for FileTeeLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.inner.log(record);

        let entry = LogEntry::now(
            &record.level().to_string().to_lowercase(),
            record.target(),
            &record.args().to_string(),
        );
        self.file.append_entry(&entry);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the process logger. Filter comes from `RUST_LOG`, default `warn`.
pub fn init(log_path: &Path) -> Result<(), SetLoggerError> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.target(Target::Stderr);
    let inner = builder.build();
    let max_level = inner.filter();

    let logger = Box::leak(Box::new(FileTeeLogger {
        inner,
        file: LogFile::new(log_path),
    }));
    log::set_logger(logger)?;
    log::set_max_level(max_level);
    Ok(())
}

/// Append a line directly to the log file when no logger could be installed.
pub fn write_fallback_line(log_path: &Path, message: &str) {
    let entry = LogEntry::now("error", "kanban.log_bridge", message);
    LogFile::new(log_path).append_entry(&entry);
}
