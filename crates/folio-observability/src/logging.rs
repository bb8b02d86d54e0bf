//! Structured logging with section context.

use std::collections::BTreeMap;
use std::fmt;

use folio_core::{LogFormat, LogLevel, LoggingConfig, ResourceKey};
use serde::Serialize;

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Section name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Cache key the entry concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}]", self.level);
        if let Some(section) = &self.section {
            s.push_str(&format!(" {}:", section));
        }
        s.push(' ');
        s.push_str(&self.message);

        if let Some(key) = &self.key {
            s.push_str(&format!(" ({})", key));
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
}

/// Structured logger with section context.
///
/// Cheap to clone; sections derive a scoped copy with `for_section`.
#[derive(Debug, Clone, Default)]
pub struct StructuredLogger {
    section: Option<String>,
    min_level: LogLevel,
    format: LogFormat,
}

impl StructuredLogger {
    /// Create a logger at info level, JSON output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from configuration.
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self::new()
            .with_min_level(config.level)
            .with_format(config.format)
    }

    /// Copy of this logger scoped to a section.
    pub fn for_section(&self, section: impl Into<String>) -> Self {
        Self {
            section: Some(section.into()),
            ..self.clone()
        }
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

    /// Whether entries at `level` are emitted.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        self.builder(LogLevel::Debug, message).emit();
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        self.builder(LogLevel::Info, message).emit();
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        self.builder(LogLevel::Warn, message).emit();
    }

    /// Start building an entry.
    pub fn builder(&self, level: LogLevel, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, level, message)
    }

    /// Start building a debug log entry.
    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        self.builder(LogLevel::Debug, message)
    }

    /// Start building an info log entry.
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        self.builder(LogLevel::Info, message)
    }

    /// Start building a warn log entry.
    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        self.builder(LogLevel::Warn, message)
    }

    /// Build the entry that would be emitted, or `None` if filtered out.
    pub fn entry(
        &self,
        level: LogLevel,
        message: &str,
        key: Option<String>,
        fields: BTreeMap<String, serde_json::Value>,
    ) -> Option<LogEntry> {
        if !self.enabled(level) {
            return None;
        }

        Some(LogEntry {
            level,
            message: message.to_string(),
            section: self.section.clone(),
            key,
            fields,
        })
    }

    fn log(&self, entry: LogEntry) {
        let output = match self.format {
            LogFormat::Json => entry.to_json(),
            LogFormat::Human => entry.to_human(),
        };

        match entry.level {
            LogLevel::Trace => tracing::trace!("{}", output),
            LogLevel::Debug => tracing::debug!("{}", output),
            LogLevel::Info => tracing::info!("{}", output),
            LogLevel::Warn => tracing::warn!("{}", output),
            LogLevel::Error => tracing::error!("{}", output),
        }
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    key: Option<String>,
    fields: BTreeMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    /// Create a new log builder.
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            key: None,
            fields: BTreeMap::new(),
        }
    }

    /// Attach the cache key.
    pub fn key(mut self, key: ResourceKey) -> Self {
        self.key = Some(key.as_str().to_string());
        self
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    /// Add a displayable field.
    pub fn field_display(self, key: &str, value: &dyn fmt::Display) -> Self {
        self.field(key, value.to_string())
    }

    /// Add an integer field.
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a boolean field.
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Finish without emitting. Returns `None` if the level is filtered.
    pub fn build(self) -> Option<LogEntry> {
        self.logger
            .entry(self.level, &self.message, self.key, self.fields)
    }

    /// Emit the log entry.
    pub fn emit(self) {
        let logger = self.logger;
        if let Some(entry) = self.build() {
            logger.log(entry);
        }
    }
}
