//! Shared log buffer for capturing tracing events to display in the TUI.
//!
//! While the wizard owns the terminal, logs go here instead of stderr.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing_subscriber::Layer;

/// Maximum number of log lines to keep.
const MAX_LOG_LINES: usize = 500;

/// A log line with level and message.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub level: LogLevel,
    pub target: String,
    pub message: String,
}

/// Log level for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Shared buffer for storing log lines.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    inner: Arc<Mutex<VecDeque<LogLine>>>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogBuffer {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_LINES))),
        }
    }

    /// Push a new log line, removing oldest if at capacity.
    pub fn push(&self, line: LogLine) {
        match self.inner.lock() {
            Ok(mut buffer) => {
                if buffer.len() >= MAX_LOG_LINES {
                    buffer.pop_front();
                }
                buffer.push_back(line);
            }
            Err(_) => {
                tracing::error!("Log buffer mutex poisoned, dropping log line");
            }
        }
    }

    /// Lines visible in a pane of `height` rows, scrolled up by `scroll` lines.
    pub fn window(&self, height: usize, scroll: usize) -> Vec<LogLine> {
        match self.inner.lock() {
            Ok(buffer) => {
                let end = buffer.len().saturating_sub(scroll);
                let start = end.saturating_sub(height);
                buffer.range(start..end).cloned().collect()
            }
            Err(_) => Vec::new(),
        }
    }

    /// Get the number of log lines.
    pub fn len(&self) -> usize {
        match self.inner.lock() {
            Ok(buffer) => buffer.len(),
            Err(_) => 0,
        }
    }

    /// Check if buffer is empty.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A tracing layer that writes to our LogBuffer.
pub struct LogBufferLayer {
    buffer: LogBuffer,
}

impl LogBufferLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for LogBufferLayer
where
    S: tracing::Subscriber,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();

        let level = match *metadata.level() {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::ERROR => LogLevel::Error,
        };

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.buffer.push(LogLine {
            level,
            target: metadata.target().to_string(),
            message: visitor.finish(),
        });
    }
}

/// Field names whose values must never reach the screen.
const SECRET_FIELDS: &[&str] = &["seed", "suri", "phrase", "password"];

/// Visitor that renders the message followed by ` key=value` pairs.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: String) {
        if SECRET_FIELDS.contains(&name) {
            self.fields.push(format!("{}=<redacted>", name));
        } else {
            self.fields.push(format!("{}={}", name, value));
        }
    }

    fn finish(self) -> String {
        let mut out = self.message;
        for field in self.fields {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&field);
        }
        out
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.push_field(field.name(), format!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), value.to_string());
        }
    }
}
