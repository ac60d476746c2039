use std::{
    fmt::Display,
    io::Write,
    sync::{Arc, Mutex},
};

use crate::level::Level;

/// Timestamp format shared by emission and date-token parsing unless a
/// caller overrides it.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct Config {
    pub datetime_format: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Destination for emitted lines. The logger writes one complete line per
/// call and never closes or owns the underlying handle.
pub trait LogSink {
    fn write_line(&mut self, line: &str) -> eyre::Result<()>;
}

pub struct StdoutSink {
    handle: std::io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            handle: std::io::stdout(),
        }
    }
}

impl LogSink for StdoutSink {
    fn write_line(&mut self, line: &str) -> eyre::Result<()> {
        let mut writer = self.handle.lock();
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

pub struct StderrSink {
    handle: std::io::Stderr,
}

impl StderrSink {
    pub fn new() -> Self {
        Self {
            handle: std::io::stderr(),
        }
    }
}

impl LogSink for StderrSink {
    fn write_line(&mut self, line: &str) -> eyre::Result<()> {
        let mut writer = self.handle.lock();
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

pub struct NullSink {}

impl NullSink {
    pub fn new() -> Self {
        Self {}
    }
}

impl LogSink for NullSink {
    fn write_line(&mut self, _line: &str) -> eyre::Result<()> {
        Ok(())
    }
}

/// In-memory sink. The buffer handle is shared so a test or a capture path
/// can read back what was written.
#[derive(Clone, Default)]
pub struct BufferSink {
    buf: Arc<Mutex<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buf.lock().map(|b| b.clone()).unwrap_or_default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl LogSink for BufferSink {
    fn write_line(&mut self, line: &str) -> eyre::Result<()> {
        let mut buf = self.buf.lock().map_err(|e| eyre::eyre!(e.to_string()))?;
        buf.push_str(line);
        Ok(())
    }
}

/// Leveled line emitter.
///
/// Writes `[<timestamp>] <LEVELNAME> <msg>\n` to its sink for every message
/// whose severity passes the threshold: lower rank means more severe, so a
/// message is written iff `level <= threshold`. EMERGENCY always passes;
/// DEBUG passes only when the threshold is DEBUG.
pub struct Logger {
    level: Level,
    sink: Box<dyn LogSink>,
    config: Config,
}

impl Logger {
    /// Logger writing to stdout.
    pub fn new(level: Level) -> Self {
        Self::with_sink(level, Box::new(StdoutSink::new()))
    }

    pub fn with_sink(level: Level, sink: Box<dyn LogSink>) -> Self {
        Self {
            level,
            sink,
            config: Config::new(),
        }
    }

    /// Logger writing to stdout, with the level resolved from a name
    /// case-insensitively. Unknown names fall back to DEBUG, i.e. log
    /// everything.
    pub fn from_name(name: &str) -> Self {
        Self::from_name_with_sink(name, Box::new(StdoutSink::new()))
    }

    pub fn from_name_with_sink(name: &str, sink: Box<dyn LogSink>) -> Self {
        let level = Level::from_name(name).unwrap_or(Level::Debug);
        Self::with_sink(level, sink)
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Conditionally write one line. Sink failures are swallowed: emission
    /// never raises, and there is no retry or buffering.
    pub fn emit(&mut self, level: Level, msg: impl Display) {
        if level > self.level {
            return;
        }

        let timestamp = chrono::Local::now().format(&self.config.datetime_format);
        let line = format!("[{}] {} {}\n", timestamp, level, msg);
        let _ = self.sink.write_line(&line);
    }

    /// System is unusable.
    pub fn emergency(&mut self, msg: impl Display) {
        self.emit(Level::Emergency, msg);
    }

    /// Action must be taken immediately.
    pub fn alert(&mut self, msg: impl Display) {
        self.emit(Level::Alert, msg);
    }

    /// Critical condition.
    pub fn critical(&mut self, msg: impl Display) {
        self.emit(Level::Critical, msg);
    }

    /// Error condition.
    pub fn error(&mut self, msg: impl Display) {
        self.emit(Level::Error, msg);
    }

    /// Warning condition.
    pub fn warning(&mut self, msg: impl Display) {
        self.emit(Level::Warning, msg);
    }

    /// Normal but significant condition.
    pub fn notice(&mut self, msg: impl Display) {
        self.emit(Level::Notice, msg);
    }

    /// Purely informational message.
    pub fn info(&mut self, msg: impl Display) {
        self.emit(Level::Info, msg);
    }

    /// Application debug messages.
    pub fn debug(&mut self, msg: impl Display) {
        self.emit(Level::Debug, msg);
    }
}
