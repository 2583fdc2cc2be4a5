//! Configuration schema definitions.
//!
//! All types derive Serde traits so a config can be read from a TOML file
//! or built directly in code.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Root configuration for a [`LogRouter`](crate::LogRouter).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum level (debug, info, warn, error, dpanic, panic, fatal).
    pub level: String,

    /// Console encoding: "console" for colored text, "json" for JSON lines.
    pub format: String,

    /// Also write JSON lines to `file_path`.
    pub enable_file: bool,

    /// Target log file. Required when `enable_file` is set.
    pub file_path: PathBuf,

    /// Logger name written with every record. Empty means unnamed.
    pub name: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "console".to_string(),
            enable_file: false,
            file_path: PathBuf::new(),
            name: String::new(),
        }
    }
}

impl LoggerConfig {
    /// Console-only config at the given level.
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    /// Enable the JSON file sink at `path`.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.enable_file = true;
        self.file_path = path.into();
        self
    }
}

/// Encoding used by the console sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "console" | "text" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "console");
        assert!(!config.enable_file);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: LoggerConfig = toml::from_str(r#"level = "warn""#).unwrap();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, "console");
        assert!(config.file_path.as_os_str().is_empty());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("".parse::<OutputFormat>(), Ok(OutputFormat::Console));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
