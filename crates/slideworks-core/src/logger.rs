// Structured service logger with colored output, level filtering, and a
// pluggable handler so tests can capture what handlers log.

use std::fmt;
use std::sync::Arc;

use crate::env;

/// ANSI color codes used by the default formatter.
pub mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BRIGHT: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub mod fg {
        pub const RED: &str = "\x1b[31m";
        pub const GREEN: &str = "\x1b[32m";
        pub const YELLOW: &str = "\x1b[33m";
        pub const BLUE: &str = "\x1b[34m";
        pub const MAGENTA: &str = "\x1b[35m";
    }
}

/// Log levels, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Success = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// ANSI color for this log level.
    pub fn color(&self) -> &'static str {
        match self {
            LogLevel::Debug => ansi::fg::MAGENTA,
            LogLevel::Info => ansi::fg::BLUE,
            LogLevel::Success => ansi::fg::GREEN,
            LogLevel::Warn => ansi::fg::YELLOW,
            LogLevel::Error => ansi::fg::RED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "debug" => Self::Debug,
            "info" => Self::Info,
            "success" => Self::Success,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Warn,
        }
    }
}

/// Logger configuration options.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Whether logging is disabled entirely.
    pub disabled: bool,
    /// Whether to disable ANSI color output.
    pub disable_colors: bool,
    /// The minimum log level to emit.
    pub level: LogLevel,
    /// Optional custom log handler (overrides default stderr/stdout output).
    pub custom_handler: Option<Arc<dyn LogHandler>>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        // Production stays quiet below Warn; everywhere else keeps Debug.
        let level = if env::is_production() {
            LogLevel::Warn
        } else {
            LogLevel::Debug
        };
        Self {
            disabled: false,
            disable_colors: false,
            level,
            custom_handler: None,
        }
    }
}

/// Custom log handler trait for user-provided logging backends.
pub trait LogHandler: Send + Sync + fmt::Debug {
    fn handle(&self, level: LogLevel, message: &str);
}

/// The service logger carried on the request context.
#[derive(Clone)]
pub struct AppLogger {
    config: LoggerConfig,
}

impl fmt::Debug for AppLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppLogger")
            .field("level", &self.config.level)
            .field("disabled", &self.config.disabled)
            .finish()
    }
}

impl AppLogger {
    /// Create a new logger with the given configuration.
    pub fn new(config: LoggerConfig) -> Self {
        Self { config }
    }

    /// Get the current log level.
    pub fn level(&self) -> LogLevel {
        self.config.level
    }

    /// Whether a given level should be published.
    pub fn should_publish(&self, level: LogLevel) -> bool {
        if self.config.disabled {
            return false;
        }
        level >= self.config.level
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Success, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Emit a message at the given level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.should_publish(level) {
            return;
        }

        if let Some(ref handler) = self.config.custom_handler {
            handler.handle(level, message);
            return;
        }

        let formatted = self.format_message(level, message);
        match level {
            LogLevel::Error | LogLevel::Warn => eprintln!("{formatted}"),
            _ => println!("{formatted}"),
        }
    }

    /// Format a log message with timestamp, level, and service prefix.
    fn format_message(&self, level: LogLevel, message: &str) -> String {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        if self.config.disable_colors {
            format!("{} {} [Slideworks]: {}", timestamp, level.as_str(), message)
        } else {
            format!(
                "{dim}{timestamp}{reset} {color}{level}{reset} {bright}[Slideworks]:{reset} {message}",
                dim = ansi::DIM,
                reset = ansi::RESET,
                color = level.color(),
                level = level.as_str(),
                bright = ansi::BRIGHT,
            )
        }
    }
}

impl Default for AppLogger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Success);
        assert!(LogLevel::Success < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn log_level_from_str() {
        assert_eq!(LogLevel::from("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from("error"), LogLevel::Error);
        assert_eq!(LogLevel::from("unknown"), LogLevel::Warn);
    }

    #[test]
    fn should_publish_respects_level() {
        let logger = AppLogger::new(LoggerConfig {
            level: LogLevel::Warn,
            ..Default::default()
        });
        assert!(!logger.should_publish(LogLevel::Debug));
        assert!(!logger.should_publish(LogLevel::Info));
        assert!(logger.should_publish(LogLevel::Warn));
        assert!(logger.should_publish(LogLevel::Error));
    }

    #[test]
    fn disabled_logger_publishes_nothing() {
        let logger = AppLogger::new(LoggerConfig {
            disabled: true,
            ..Default::default()
        });
        assert!(!logger.should_publish(LogLevel::Error));
    }

    #[test]
    fn format_message_without_color() {
        let logger = AppLogger::new(LoggerConfig {
            disable_colors: true,
            level: LogLevel::Debug,
            ..Default::default()
        });
        let msg = logger.format_message(LogLevel::Info, "test message");
        assert!(msg.contains("INFO"));
        assert!(msg.contains("[Slideworks]:"));
        assert!(msg.contains("test message"));
        assert!(!msg.contains("\x1b["));
    }

    #[test]
    fn format_message_with_color() {
        let logger = AppLogger::new(LoggerConfig {
            disable_colors: false,
            level: LogLevel::Debug,
            ..Default::default()
        });
        let msg = logger.format_message(LogLevel::Error, "something failed");
        assert!(msg.contains("\x1b["));
        assert!(msg.contains("ERROR"));
    }

    #[derive(Debug)]
    struct CaptureHandler {
        captured: std::sync::Mutex<Vec<(LogLevel, String)>>,
    }

    impl LogHandler for CaptureHandler {
        fn handle(&self, level: LogLevel, message: &str) {
            self.captured.lock().unwrap().push((level, message.to_string()));
        }
    }

    #[test]
    fn custom_handler_receives_messages() {
        let handler = Arc::new(CaptureHandler {
            captured: std::sync::Mutex::new(Vec::new()),
        });
        let logger = AppLogger::new(LoggerConfig {
            level: LogLevel::Debug,
            custom_handler: Some(handler.clone()),
            disabled: false,
            disable_colors: false,
        });
        logger.success("created");
        logger.error("cleanup failed");

        let captured = handler.captured.lock().unwrap();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0], (LogLevel::Success, "created".to_string()));
        assert_eq!(captured[1], (LogLevel::Error, "cleanup failed".to_string()));
    }
}
