//! Line-oriented log sink with three channels.
//!
//! All writes are serialised by one internal mutex. Single lines go
//! through [`Logger::info`] and friends; multi-line reports take the lock
//! once via [`Logger::lock`] so other threads cannot interleave. The first
//! write failure is reported to stderr once, after which the sink silently
//! drops everything.

use crate::error::{FasError, FasResult};
use chrono::Local;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

struct Sink {
    out: Box<dyn Write + Send>,
    failed: bool,
}

/// Shared, mutex-serialised log sink.
pub struct Logger {
    sink: Mutex<Sink>,
}

impl Logger {
    /// Log to standard error.
    pub fn stderr() -> Self {
        Self::from_sink(Box::new(io::stderr()))
    }

    /// Log to a file, creating parent directories as needed.
    pub fn to_file(path: impl AsRef<Path>) -> FasResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    FasError::Logger(format!("cannot create `{}`: {e}", parent.display()))
                })?;
            }
        }
        let file = File::create(path)
            .map_err(|e| FasError::Logger(format!("cannot open `{}`: {e}", path.display())))?;
        Ok(Self::from_sink(Box::new(file)))
    }

    /// Log to an arbitrary writer.
    pub fn from_sink(out: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Mutex::new(Sink { out, failed: false }),
        }
    }

    /// Discard everything.
    pub fn null() -> Self {
        Self::from_sink(Box::new(io::sink()))
    }

    pub fn info(&self, message: &str) {
        self.lock().info(message);
    }

    pub fn warning(&self, message: &str) {
        self.lock().warning(message);
    }

    pub fn error(&self, message: &str) {
        self.lock().error(message);
    }

    /// Hold the sink for a multi-line report.
    pub fn lock(&self) -> LoggerGuard<'_> {
        LoggerGuard {
            sink: self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner()),
        }
    }
}

/// Exclusive access to the sink; lines written through the guard cannot be
/// interleaved by other threads.
pub struct LoggerGuard<'a> {
    sink: MutexGuard<'a, Sink>,
}

impl LoggerGuard<'_> {
    pub fn info(&mut self, message: &str) {
        self.write_line("INFO   ", message);
    }

    pub fn warning(&mut self, message: &str) {
        self.write_line("WARNING", message);
    }

    pub fn error(&mut self, message: &str) {
        self.write_line("ERROR  ", message);
    }

    fn write_line(&mut self, channel: &str, message: &str) {
        if self.sink.failed {
            return;
        }
        let stamp = Local::now().format("[%Y-%m-%d %H:%M:%S]");
        let result = writeln!(self.sink.out, "{stamp} {channel} {message}")
            .and_then(|()| self.sink.out.flush());
        if let Err(e) = result {
            self.sink.failed = true;
            eprintln!("log sink failed ({e}); further log output is dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingSink {
        writes: usize,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.writes == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "down"));
            }
            self.writes -= 1;
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn channels_are_labelled() {
        let buf = SharedBuf(Arc::new(Mutex::new(Vec::new())));
        let logger = Logger::from_sink(Box::new(buf.clone()));
        logger.info("hello");
        logger.warning("careful");
        logger.error("broken");
        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("INFO") && lines[0].ends_with("hello"));
        assert!(lines[1].contains("WARNING") && lines[1].ends_with("careful"));
        assert!(lines[2].contains("ERROR") && lines[2].ends_with("broken"));
    }

    #[test]
    fn guard_groups_lines() {
        let buf = SharedBuf(Arc::new(Mutex::new(Vec::new())));
        let logger = Logger::from_sink(Box::new(buf.clone()));
        {
            let mut guard = logger.lock();
            guard.info("first");
            guard.info("second");
        }
        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn failed_sink_degrades_to_noop() {
        let logger = Logger::from_sink(Box::new(FailingSink { writes: 1 }));
        logger.info("survives");
        logger.info("kills the sink");
        logger.info("silently dropped");
        logger.error("also dropped");
    }

    #[test]
    fn file_logger_rejects_bad_paths() {
        let result = Logger::to_file("/proc/definitely/not/writable/log.txt");
        assert!(matches!(result, Err(FasError::Logger(_))));
    }
}
