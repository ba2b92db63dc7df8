//! Human and JSON output for CLI commands
//!
//! Human output goes to the terminal line by line. JSON output keeps stdout
//! to a single document per command, so detail lines are dropped and only
//! status lines and [`OutputFormatter::print_json`] payloads are written.

use std::fmt::Display;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);

    /// Detail line under a status line
    fn info(&self, _message: &str) {}

    /// Labelled detail line, e.g. `Lock file: /run/user/1000/b2sync.pid`
    fn field(&self, label: &str, value: &dyn Display) {
        self.info(&format!("{label}: {value}"));
    }

    fn print_json(&self, _value: &serde_json::Value) {}
}

pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {message}");
    }

    fn info(&self, message: &str) {
        println!("  {message}");
    }
}

pub struct JsonFormatter;

fn status_line(level: &str, message: &str) -> serde_json::Value {
    serde_json::json!({ "level": level, "message": message })
}

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!("{}", status_line("ok", message));
    }

    fn error(&self, message: &str) {
        eprintln!("{}", status_line("error", message));
    }

    fn warn(&self, message: &str) {
        eprintln!("{}", status_line("warning", message));
    }

    fn print_json(&self, value: &serde_json::Value) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{text}"),
            Err(e) => self.error(&format!("Failed to encode output: {e}")),
        }
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Human => Box::new(HumanFormatter),
    }
}
