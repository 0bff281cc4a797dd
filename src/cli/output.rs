//! Output formatting for CLI commands

use std::fmt::Write;

use serde::Serialize;

use crate::storage;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<storage::OutputFormat> for OutputFormat {
    fn from(format: storage::OutputFormat) -> Self {
        match format {
            storage::OutputFormat::Text => OutputFormat::Text,
            storage::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    date_format: String,
}

impl Output {
    pub fn new(format: OutputFormat, date_format: impl Into<String>) -> Self {
        Self {
            format,
            date_format: date_format.into(),
        }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Formats a millisecond timestamp with the configured date format
    ///
    /// A malformed format string falls back to RFC 3339.
    pub fn date(&self, millis: i64) -> String {
        let Some(date) = chrono::DateTime::from_timestamp_millis(millis) else {
            return "?".to_string();
        };

        let mut formatted = String::new();
        if write!(formatted, "{}", date.format(&self.date_format)).is_err() {
            return date.to_rfc3339();
        }
        formatted
    }
}
