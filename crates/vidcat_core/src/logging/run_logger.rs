//! Per-directory run logger.
//!
//! One logger per processed directory. Lines go to
//! `<logs folder>/<run name>.log` and, when a callback is set, to that
//! sink as well. Transcoder output is routed through
//! [`RunLogger::tool_line`], which feeds a bounded tail that is dumped
//! when the tool fails.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

/// Logger for a single directory run.
pub struct RunLogger {
    run_name: String,
    log_path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
    callback: Option<LogCallback>,
    config: LogConfig,
    tail: Mutex<VecDeque<String>>,
}

impl RunLogger {
    /// Create the logger and its log file.
    pub fn new(
        run_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> std::io::Result<Self> {
        let run_name = run_name.into();
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&run_name)));
        let file = File::create(&log_path)?;

        Ok(Self {
            run_name,
            log_path,
            writer: Mutex::new(Some(BufWriter::new(file))),
            callback,
            tail: Mutex::new(VecDeque::with_capacity(config.error_tail)),
            config,
        })
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }
        self.output(&self.format_message(message));
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    pub fn command(&self, command: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Command.format(command));
    }

    pub fn phase(&self, phase_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Phase.format(phase_name));
    }

    pub fn section(&self, section_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Section.format(section_name));
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    /// Record one line of external tool output.
    ///
    /// Always kept in the tail; written out only when not compact.
    pub fn tool_line(&self, line: &str) {
        {
            let mut tail = self.tail.lock();
            if self.config.error_tail > 0 && tail.len() >= self.config.error_tail {
                tail.pop_front();
            }
            if self.config.error_tail > 0 {
                tail.push_back(line.to_string());
            }
        }

        if !self.config.compact {
            self.log(LogLevel::Info, line);
        }
    }

    /// Dump the tool output tail, typically after a failure.
    pub fn show_tail(&self, header: &str) {
        let tail = self.tail.lock();
        if tail.is_empty() {
            return;
        }

        self.output(&self.format_message(&format!("[{}/tail]", header)));
        for line in tail.iter() {
            self.output(&self.format_message(line));
        }
    }

    pub fn clear_tail(&self) {
        self.tail.lock().clear();
    }

    pub fn tail(&self) -> Vec<String> {
        self.tail.lock().iter().cloned().collect()
    }

    /// Log transcoder arguments one option per line.
    pub fn log_transcoder_args_pretty(&self, pretty: &str) {
        self.info("--- transcoder arguments ---");
        for line in pretty.lines() {
            self.info(&format!("  {}", line));
        }
        self.info("----------------------------");
    }

    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Flush and release the log file.
    pub fn close(&self) {
        self.flush();
        *self.writer.lock() = None;
    }

    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
        } else {
            message.to_string()
        }
    }

    fn output(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }
        if let Some(ref callback) = self.callback {
            callback(formatted);
        }
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Replace characters that are not allowed in file names.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
