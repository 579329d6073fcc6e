//! Per-request log capture.
//!
//! Every request gets its own [`RequestLogger`]. Entries are kept in insertion
//! order and mirrored to `tracing`; [`RequestLogger::get_log`] renders them into
//! a single-line value fit for the `x-fc-log-result` header.

use chrono::{DateTime, Local};
use tracing::{error, info, warn};

/// Lifecycle banners written to the process log. The platform scrapes these.
pub struct LogString;

impl LogString {
    pub const RUNTIME_STARTED: &'static str = "FunctionCompute custom runtime inited.";
    pub const INVOKE_STARTED: &'static str = "FC Invoke Start RequestId: ";
    pub const INVOKE_ENDED: &'static str = "FC Invoke End RequestId: ";
    pub const INIT_STARTED: &'static str = "FC Initialize Start RequestId: ";
    pub const INIT_ENDED: &'static str = "FC Initialize End RequestId: ";

    pub fn start_invoke(request_id: &str) {
        info!("{}{}", Self::INVOKE_STARTED, request_id);
    }

    pub fn end_invoke(request_id: &str) {
        info!("{}{}", Self::INVOKE_ENDED, request_id);
    }

    pub fn start_init(request_id: &str) {
        info!("{}{}", Self::INIT_STARTED, request_id);
    }

    pub fn end_init(request_id: &str) {
        info!("{}{}", Self::INIT_ENDED, request_id);
    }
}

/// Severity of a request log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded log line, stamped with the request id current when written.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub request_id: String,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    /// `<time> <request id> [<LEVEL>] <message>`, without a line terminator.
    pub fn render(&self) -> String {
        format!(
            "{} {} [{}] {}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S"),
            self.request_id,
            self.level,
            self.message
        )
    }
}

/// Append-only log buffer owned by one request.
///
/// There is no cap on the number or size of entries.
#[derive(Debug, Clone, Default)]
pub struct RequestLogger {
    request_id: String,
    entries: Vec<LogEntry>,
}

impl RequestLogger {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            entries: Vec::new(),
        }
    }

    /// Set the request id stamped on subsequent lines. Earlier lines keep
    /// the id they were written with.
    pub fn set_request_id(&mut self, request_id: impl Into<String>) {
        self.request_id = request_id.into();
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn log_info(&mut self, msg: impl Into<String>) {
        self.log(LogLevel::Info, msg.into());
    }

    pub fn log_warn(&mut self, msg: impl Into<String>) {
        self.log(LogLevel::Warn, msg.into());
    }

    pub fn log_error(&mut self, msg: impl Into<String>) {
        self.log(LogLevel::Error, msg.into());
    }

    fn log(&mut self, level: LogLevel, message: String) {
        match level {
            LogLevel::Info => info!(request_id = %self.request_id, "{}", message),
            LogLevel::Warn => warn!(request_id = %self.request_id, "{}", message),
            LogLevel::Error => error!(request_id = %self.request_id, "{}", message),
        }
        self.entries.push(LogEntry {
            timestamp: Local::now(),
            request_id: self.request_id.clone(),
            level,
            message,
        });
    }

    /// Recorded entries in insertion order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Render all entries, one `\n`-terminated line each, as a single header-safe
    /// line (see [`escape_header_value`]).
    pub fn get_log(&self) -> String {
        let raw: String = self
            .entries
            .iter()
            .map(|entry| entry.render() + "\n")
            .collect();
        escape_header_value(&raw)
    }
}

/// Make `raw` fit in one HTTP header value.
///
/// `\n` and `\r` become the two-character sequences `\n` and `\r`; any other
/// control character except tab is written as a Rust escape (`\u{1b}`).
/// Non-ASCII text is kept as is.
pub fn escape_header_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push(c),
            c if c.is_control() => out.extend(c.escape_default()),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_insertion_order_and_level() {
        let mut logger = RequestLogger::new("req-1");
        logger.log_info("first");
        logger.log_warn("second");
        logger.log_error("third");

        let levels: Vec<_> = logger.entries().iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![LogLevel::Info, LogLevel::Warn, LogLevel::Error]);
        let messages: Vec<_> = logger.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn get_log_formats_lines() {
        let mut logger = RequestLogger::new("req-1");
        logger.log_warn("careful");

        let log = logger.get_log();
        assert!(log.contains(" req-1 [WARN] careful\\n"));
        assert!(log.ends_with("\\n"));
        // Local time, seconds precision: "YYYY-MM-DDTHH:MM:SS "
        let ts = &log[..19];
        assert_eq!(ts.as_bytes()[4], b'-');
        assert_eq!(ts.as_bytes()[10], b'T');
        assert_eq!(ts.as_bytes()[16], b':');
        assert_eq!(log.as_bytes()[19], b' ');
    }

    #[test]
    fn get_log_never_contains_raw_newline() {
        let mut logger = RequestLogger::new("req-1");
        logger.log_info("line1\nline2");
        logger.log_error("tail\n");

        let log = logger.get_log();
        assert!(log.contains("line1\\nline2"));
        assert!(!log.contains('\n'));
    }

    #[test]
    fn empty_logger_renders_empty() {
        assert_eq!(RequestLogger::new("r").get_log(), "");
    }

    #[test]
    fn request_id_is_stamped_at_write_time() {
        let mut logger = RequestLogger::default();
        logger.log_info("before");
        logger.set_request_id("late");
        logger.log_info("after");

        assert_eq!(logger.request_id(), "late");
        assert_eq!(logger.entries()[0].request_id, "");
        assert_eq!(logger.entries()[1].request_id, "late");
        let log = logger.get_log();
        assert!(log.contains("  [INFO] before\\n"));
        assert!(log.contains(" late [INFO] after\\n"));
    }

    #[test]
    fn get_log_escapes_carriage_returns_and_controls() {
        let mut logger = RequestLogger::new("req-1");
        logger.log_info("line1\r\nline2");
        logger.log_warn("bell\u{7}\tdel\u{7f} café");

        let log = logger.get_log();
        assert!(log.contains("line1\\r\\nline2"));
        assert!(log.contains("bell\\u{7}\tdel\\u{7f} café"));
        assert!(!log.chars().any(|c| c.is_control() && c != '\t'));
        assert!(hyper::header::HeaderValue::from_bytes(log.as_bytes()).is_ok());
    }
}
