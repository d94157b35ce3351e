//! Structured logging with widget instance context.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::InstanceId;

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse a level name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Widget instance the entry belongs to.
    pub instance_id: String,
    /// Component name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Microseconds since the logger was created (the widget was mounted).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_us: Option<u64>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {}", self.level, self.message);

        if let Some(elapsed) = self.elapsed_us {
            s.push_str(&format!(" ({}us)", elapsed));
        }

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            s.push_str(&fields.join(" "));
        }

        s
    }

    /// Look up a field value.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

/// Shared in-memory buffer of log entries.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl LogCapture {
    /// Create an empty capture buffer.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, entry: LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }

    /// Snapshot of every captured entry.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Captured entries whose message matches exactly.
    pub fn with_message(&self, message: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.message == message)
            .collect()
    }

    /// Number of captured entries.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Destination for log entries.
#[derive(Debug, Clone, Default)]
pub enum LogSink {
    /// Formatted lines on stderr.
    #[default]
    Stderr,
    /// Forward to the `tracing` dispatcher installed by the host.
    Tracing,
    /// Keep entries in memory.
    Memory(LogCapture),
}

/// Structured logger with widget context.
///
/// Every entry carries the instance id of the mounted widget and the time
/// elapsed since the logger was created.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    instance_id: InstanceId,
    component: Option<String>,
    start_time: Option<std::time::Instant>,
    min_level: LogLevel,
    format: LogFormat,
    sink: LogSink,
}

impl StructuredLogger {
    /// Create a new logger for a widget instance.
    pub fn new(instance_id: InstanceId) -> Self {
        Self {
            instance_id,
            component: None,
            start_time: monotonic_now(),
            min_level: LogLevel::Info,
            format: LogFormat::Json,
            sink: LogSink::Stderr,
        }
    }

    /// Logger that drops everything below `Error` and writes nowhere visible.
    pub fn disabled() -> Self {
        Self::new(InstanceId::from_string("disabled"))
            .with_min_level(LogLevel::Error)
            .with_sink(LogSink::Memory(LogCapture::new()))
    }

    /// Set the component name.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the sink.
    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    /// Log at trace level.
    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message, BTreeMap::new());
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, BTreeMap::new());
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, BTreeMap::new());
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, BTreeMap::new());
    }

    /// Log at error level.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, BTreeMap::new());
    }

    fn log(&self, level: LogLevel, message: &str, fields: BTreeMap<String, serde_json::Value>) {
        if level < self.min_level {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            instance_id: self.instance_id.to_string(),
            component: self.component.clone(),
            fields,
            elapsed_us: self.elapsed_us(),
        };

        match &self.sink {
            LogSink::Stderr => {
                let output = match self.format {
                    LogFormat::Json => entry.to_json(),
                    LogFormat::Human => entry.to_human(),
                };
                eprintln!("{}", output);
            }
            LogSink::Tracing => forward_to_tracing(&entry, self.format),
            LogSink::Memory(capture) => capture.push(entry),
        }
    }

    /// Get the instance ID.
    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    /// Get elapsed time since logger creation.
    pub fn elapsed_us(&self) -> Option<u64> {
        self.start_time.map(|t| t.elapsed().as_micros() as u64)
    }
}

fn forward_to_tracing(entry: &LogEntry, format: LogFormat) {
    let line = match format {
        LogFormat::Json => entry.to_json(),
        LogFormat::Human => entry.to_human(),
    };
    let instance = entry.instance_id.as_str();

    match entry.level {
        LogLevel::Trace => tracing::trace!(instance, "{}", line),
        LogLevel::Debug => tracing::debug!(instance, "{}", line),
        LogLevel::Info => tracing::info!(instance, "{}", line),
        LogLevel::Warn => tracing::warn!(instance, "{}", line),
        LogLevel::Error => tracing::error!(instance, "{}", line),
    }
}

// `Instant::now` panics on wasm32-unknown-unknown.
#[cfg(not(target_arch = "wasm32"))]
fn monotonic_now() -> Option<std::time::Instant> {
    Some(std::time::Instant::now())
}

#[cfg(target_arch = "wasm32")]
fn monotonic_now() -> Option<std::time::Instant> {
    None
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    /// Create a new log builder.
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    /// Add an integer field.
    pub fn field_i64(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add an unsigned integer field.
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a boolean field.
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a duration field (in milliseconds).
    pub fn duration_ms(mut self, key: &str, duration: std::time::Duration) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(duration.as_millis() as u64));
        self
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

impl StructuredLogger {
    /// Start building an info log entry.
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    /// Start building a warn log entry.
    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    /// Start building an error log entry.
    pub fn error_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Error, message)
    }

    /// Start building a debug log entry.
    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(level: LogLevel) -> (StructuredLogger, LogCapture) {
        let capture = LogCapture::new();
        let logger = StructuredLogger::new(InstanceId::from_string("test-widget"))
            .with_component("product-detail")
            .with_min_level(level)
            .with_sink(LogSink::Memory(capture.clone()));
        (logger, capture)
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn test_min_level_filters() {
        let (logger, capture) = captured(LogLevel::Info);
        logger.debug("hidden");
        logger.info("shown");
        logger.error("also shown");

        let messages: Vec<String> = capture.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["shown", "also shown"]);
    }

    #[test]
    fn test_builder_fields() {
        let (logger, capture) = captured(LogLevel::Debug);
        logger
            .info_builder("Added to cart")
            .field_u64("quantity", 3)
            .field_bool("notification_visible", true)
            .field("product", "Classic Leather Watch")
            .emit();

        let entry = &capture.with_message("Added to cart")[0];
        assert_eq!(entry.instance_id, "test-widget");
        assert_eq!(entry.component.as_deref(), Some("product-detail"));
        assert_eq!(entry.field("quantity"), Some(&serde_json::json!(3)));
        assert_eq!(entry.field("notification_visible"), Some(&serde_json::json!(true)));
    }

    #[test]
    fn test_entry_json_flattens_fields() {
        let (logger, capture) = captured(LogLevel::Info);
        logger.info_builder("Mounted").field_i64("images", 4).emit();

        let json = capture.entries()[0].to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["level"], "info");
        assert_eq!(value["images"], 4);
        assert_eq!(value["instance_id"], "test-widget");
    }

    #[test]
    fn test_entry_human_format() {
        let entry = LogEntry {
            level: LogLevel::Warn,
            message: "Image substituted".to_string(),
            instance_id: "w".to_string(),
            component: None,
            fields: BTreeMap::from([("slot".to_string(), serde_json::json!("main"))]),
            elapsed_us: Some(12),
        };
        assert_eq!(entry.to_human(), r#"[WARN] Image substituted (12us) | slot="main""#);
    }

    #[test]
    fn test_disabled_logger_drops_info() {
        let logger = StructuredLogger::disabled();
        logger.info("nothing");
        match &logger.sink {
            LogSink::Memory(capture) => assert!(capture.is_empty()),
            other => panic!("unexpected sink {:?}", other),
        }
    }
}
