//! Logging configuration and utilities for skipset.
//!
//! Logging is in-process and structured: components record [`LogEntry`]
//! values into a bounded [`LogCollector`], gated by a [`LoggingConfig`].
//! Nothing is written to stdout or stderr; callers decide what to do with
//! the collected entries (render them, assert on them, discard them).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Default number of entries a collector keeps before dropping the oldest.
pub const DEFAULT_CAPACITY: usize = 256;

/// Log level for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn severity(self) -> u8 {
        match self {
            LogLevel::Off => 0,
            LogLevel::Error => 1,
            LogLevel::Warn => 2,
            LogLevel::Info => 3,
            LogLevel::Debug => 4,
            LogLevel::Trace => 5,
        }
    }

    /// Check if a threshold of `self` lets a message at `level` through.
    pub fn should_log(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && self.severity() >= level.severity()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level to record
    #[serde(default)]
    pub level: LogLevel,
    /// Render format
    #[serde(default)]
    pub format: LogFormat,
    /// Include timestamps when rendering
    #[serde(default = "default_true")]
    pub timestamps: bool,
    /// Component-specific log levels
    #[serde(default)]
    pub component_levels: BTreeMap<String, LogLevel>,
    /// Maximum number of retained entries
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_true() -> bool {
    true
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Plain,
            timestamps: true,
            component_levels: BTreeMap::new(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// A config that records nothing.
    pub fn disabled() -> Self {
        Self::default().with_level(LogLevel::Off)
    }

    /// Set the log level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the render format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Set the collector capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set a component-specific log level
    pub fn with_component_level(mut self, component: impl Into<String>, level: LogLevel) -> Self {
        self.component_levels.insert(component.into(), level);
        self
    }

    /// Get the effective log level for a component
    pub fn effective_level(&self, component: Option<&str>) -> LogLevel {
        if let Some(comp) = component
            && let Some(&level) = self.component_levels.get(comp)
        {
            return level;
        }
        self.level
    }

    /// Check if a message at the given level should be recorded
    pub fn should_log(&self, level: LogLevel, component: Option<&str>) -> bool {
        self.effective_level(component).should_log(level)
    }
}

/// A single structured log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level,
            component: None,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Create a log entry with a component
    pub fn with_component(
        level: LogLevel,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let mut entry = Self::new(level, message);
        entry.component = Some(component.into());
        entry
    }

    /// Attach a key/value field
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.fields.insert(key.into(), value.to_string());
        self
    }

    /// Render the entry in the given format.
    pub fn render(&self, format: LogFormat, timestamps: bool) -> String {
        match format {
            LogFormat::Json => {
                let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
                if !timestamps && let Some(map) = value.as_object_mut() {
                    map.remove("timestamp");
                }
                value.to_string()
            }
            LogFormat::Plain => {
                let mut out = String::new();
                if timestamps {
                    out.push_str(&self.timestamp);
                    out.push(' ');
                }
                out.push_str(&self.level.as_str().to_uppercase());
                if let Some(component) = &self.component {
                    out.push(' ');
                    out.push_str(component);
                    out.push(':');
                }
                out.push(' ');
                out.push_str(&self.message);
                for (key, value) in &self.fields {
                    out.push_str(&format!(" {key}={value}"));
                }
                out
            }
            LogFormat::Compact => {
                let mut out = format!("{}|", self.level);
                if let Some(component) = &self.component {
                    out.push_str(component);
                }
                out.push('|');
                out.push_str(&self.message);
                out
            }
        }
    }
}

/// Bounded log collector; the oldest entries are dropped first.
#[derive(Debug, Clone)]
pub struct LogCollector {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    dropped: usize,
}

impl Default for LogCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl LogCollector {
    /// Create a new log collector with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
            dropped: 0,
        }
    }

    /// Add a log entry
    pub fn push(&mut self, entry: LogEntry) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.dropped += 1;
        }
        self.entries.push_back(entry);
    }

    /// Iterate over collected entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries evicted because the collector was full
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Get entries matching a level
    pub fn filter_by_level(&self, level: LogLevel) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.level == level).collect()
    }

    /// Get entries recorded by a component
    pub fn filter_by_component(&self, component: &str) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.component.as_deref() == Some(component))
            .collect()
    }

    /// Remove and return every entry
    pub fn drain(&mut self) -> Vec<LogEntry> {
        self.entries.drain(..).collect()
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.entries.clear();
        self.dropped = 0;
    }
}

/// A collector paired with the config that gates it.
#[derive(Debug, Clone)]
pub struct Logger {
    config: LoggingConfig,
    collector: LogCollector,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggingConfig::default())
    }
}

impl Logger {
    pub fn new(config: LoggingConfig) -> Self {
        let collector = LogCollector::with_capacity(config.capacity);
        Self { config, collector }
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    pub fn collector(&self) -> &LogCollector {
        &self.collector
    }

    /// Whether an entry at `level` from `component` would be kept.
    pub fn enabled(&self, level: LogLevel, component: &str) -> bool {
        self.config.should_log(level, Some(component))
    }

    /// Record an entry if it passes the filter. `decorate` attaches fields
    /// and only runs for entries that are kept.
    pub fn log<F>(&mut self, level: LogLevel, component: &str, message: &str, decorate: F)
    where
        F: FnOnce(LogEntry) -> LogEntry,
    {
        if !self.enabled(level, component) {
            return;
        }
        let entry = LogEntry::with_component(level, component, message);
        self.collector.push(decorate(entry));
    }

    /// Render every retained entry, one per line.
    pub fn render(&self) -> String {
        self.collector
            .entries()
            .map(|e| e.render(self.config.format, self.config.timestamps))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn drain(&mut self) -> Vec<LogEntry> {
        self.collector.drain()
    }

    pub fn clear(&mut self) {
        self.collector.clear();
    }
}
